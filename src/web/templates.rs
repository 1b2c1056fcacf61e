use std::borrow::Cow;

use chrono::{Datelike, Utc};

pub const COMPANY_NAME: &str = "Tech Corp";

const SITE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #ffffff; padding: 1.25rem 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; max-width: 1080px; margin: 0 auto; }
        .brand { font-size: 1.35rem; font-weight: 700; color: #0f172a; text-decoration: none; }
        nav a { color: #334155; text-decoration: none; font-weight: 600; margin-left: 1.1rem; padding-bottom: 0.2rem; }
        nav a.active { color: #1d4ed8; border-bottom: 2px solid #1d4ed8; }
        main { padding: 2rem 1.5rem; max-width: 1080px; margin: 0 auto; box-sizing: border-box; }
        section { margin-bottom: 2.5rem; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); }
        .grid { display: grid; gap: 1.25rem; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); }
        .metric-value { font-size: 2rem; font-weight: 700; color: #1d4ed8; }
        .bar { height: 0.75rem; border-radius: 999px; background: #2563eb; }
        label { display: block; margin: 1rem 0 0.4rem; font-weight: 600; }
        input, textarea { width: 100%; padding: 0.75rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; box-sizing: border-box; font-size: 1rem; }
        button { margin-top: 1.25rem; padding: 0.85rem 1.2rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; }
        button:hover { background: #1d4ed8; }
        table { width: 100%; border-collapse: collapse; background: #ffffff; }
        th, td { padding: 0.75rem 1rem; border-bottom: 1px solid #e2e8f0; text-align: left; }
        th { background: #f1f5f9; }
        .flash { padding: 0.9rem 1.1rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; }
        .flash.success { background: #dcfce7; color: #166534; }
        .flash.danger { background: #fee2e2; color: #b91c1c; }
        .note { color: #475569; line-height: 1.6; }
        .app-footer { margin: 3rem 0 1.5rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 768px) {
            nav a { margin-left: 0; margin-right: 0.9rem; }
            main { padding: 1.5rem 1rem; }
        }
"#;

/// Key, label and target of every entry in the site navigation.
const NAV_ITEMS: &[(&str, &str, &str)] = &[
    ("home", "Home", "/"),
    ("about", "About", "/about"),
    ("services", "Services", "/services"),
    ("team", "Team", "/team"),
    ("careers", "Careers", "/careers"),
    ("financials", "Financials", "/financials"),
    ("contact", "Contact", "/contact"),
];

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub active_page: &'a str,
    pub flash_html: Cow<'a, str>,
    pub body_html: Cow<'a, str>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        active_page,
        flash_html,
        body_html,
    } = layout;

    let nav_html = NAV_ITEMS
        .iter()
        .map(|(key, label, href)| {
            let class = if *key == active_page {
                r#" class="active""#
            } else {
                ""
            };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect::<Vec<_>>()
        .join("");

    let footer = render_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title} | {company}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{styles}
    </style>
</head>
<body data-active-page="{active_page}">
    <header>
        <div class="header-bar">
            <a class="brand" href="/">{company}</a>
            <nav>{nav_html}</nav>
        </div>
    </header>
    <main>
        {flash_html}
{body_html}
        {footer}
    </main>
</body>
</html>"#,
        meta_title = escape_html(meta_title),
        company = COMPANY_NAME,
        styles = SITE_STYLES,
        active_page = active_page,
        nav_html = nav_html,
        flash_html = flash_html,
        body_html = body_html,
        footer = footer,
    )
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} {company}. All rights reserved.</footer>"#,
        year = current_year,
        company = COMPANY_NAME,
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

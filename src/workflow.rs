/// Lifecycle of a content item in the publishing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentStatus {
    Draft,
    Review,
    Approved,
    Scheduled,
    Published,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 5] = [
        ContentStatus::Draft,
        ContentStatus::Review,
        ContentStatus::Approved,
        ContentStatus::Scheduled,
        ContentStatus::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Review => "review",
            ContentStatus::Approved => "approved",
            ContentStatus::Scheduled => "scheduled",
            ContentStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ContentStatus::Draft),
            "review" => Some(ContentStatus::Review),
            "approved" => Some(ContentStatus::Approved),
            "scheduled" => Some(ContentStatus::Scheduled),
            "published" => Some(ContentStatus::Published),
            _ => None,
        }
    }

    /// Statuses reachable from `self` in a single step.
    pub fn allowed_next(&self) -> &'static [ContentStatus] {
        use ContentStatus::*;
        match self {
            Draft => &[Review],
            Review => &[Draft, Approved],
            Approved => &[Review, Scheduled, Published],
            Scheduled => &[Approved, Published],
            Published => &[],
        }
    }

    pub fn can_transition_to(&self, next: ContentStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Validate a move from `self` to `next`. Staying put is not a transition.
    pub fn transition(self, next: ContentStatus) -> Result<ContentStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status transition from {} to {}", .from.as_str(), .to.as_str())]
pub struct TransitionError {
    pub from: ContentStatus,
    pub to: ContentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Blog,
    Social,
    Product,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Social => "social",
            ContentType::Product => "product",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "blog" => Some(ContentType::Blog),
            "social" => Some(ContentType::Social),
            "product" => Some(ContentType::Product),
            _ => None,
        }
    }
}

//! Homework statuses and the notification text built from them.

use std::fmt;
use std::str::FromStr;

use crate::error::StatusError;
use crate::practicum::HomeworkRecord;

/// Review status reported by the homework API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Wire name used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Fixed human-readable verdict for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::UnknownStatus(s.to_owned()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text ready to be sent to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification(String);

impl Notification {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn one homework record into a status-change notification.
pub fn translate(record: &HomeworkRecord) -> Result<Notification, StatusError> {
    let status: HomeworkStatus = record
        .status
        .as_deref()
        .ok_or(StatusError::MissingStatus)?
        .parse()?;

    let name = record
        .homework_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(StatusError::MissingName)?;

    Ok(Notification(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    )))
}

/// Notification sent to the chat when an iteration fails.
pub fn failure_notice(error: &dyn fmt::Display) -> Notification {
    Notification(format!("Сбой в работе программы: {error}"))
}

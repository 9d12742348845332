//! Learner profiles and the results aggregator.
//!
//! A profile keeps one record per exam id: the best percentage reached and
//! whether the exam was ever passed. Merging is a pure function from the old
//! profile to the new one; the caller owns the profile list and stores the
//! returned value.

use multiplicathlon_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Outcome of one scored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    /// Exam or mode identifier.
    pub id: String,
    /// Percentage of correct answers, 0 to 100.
    pub score: u32,
    /// Whether the pass threshold was exceeded.
    pub passed: bool,
}

/// Percentage of correct answers among those given, 0 when none were given.
#[must_use]
pub fn score_percent(score: u32, wrong_answers: u32) -> u32 {
    let answered = u64::from(score) + u64::from(wrong_answers);
    if answered == 0 {
        return 0;
    }
    u32::try_from(u64::from(score) * 100 / answered).unwrap_or(100)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    /// Best record per exam id, in first-seen order.
    #[serde(default)]
    pub exams: Vec<ExamResult>,
}

/// A named learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub stats: ProfileStats,
}

impl Profile {
    /// A new, inactive profile with no history.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
            stats: ProfileStats::default(),
        }
    }

    /// The stored record for `exam_id`, if any.
    #[must_use]
    pub fn exam(&self, exam_id: &str) -> Option<&ExamResult> {
        self.stats.exams.iter().find(|e| e.id == exam_id)
    }
}

/// Merges `result` into `profile`.
///
/// A new exam id is appended as is. For a known id, `passed` is never revoked
/// and `score` never decreases. `None` (an abandoned session) leaves the
/// profile unchanged. Merging the same result twice is the same as merging it
/// once.
#[must_use]
pub fn merge_result(mut profile: Profile, result: Option<&ExamResult>) -> Profile {
    let Some(result) = result else {
        return profile;
    };
    match profile.stats.exams.iter_mut().find(|e| e.id == result.id) {
        Some(existing) => {
            existing.passed = existing.passed || result.passed;
            existing.score = existing.score.max(result.score);
        }
        None => profile.stats.exams.push(result.clone()),
    }
    profile
}

/// The stored list of profiles. At most one is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileList {
    profiles: Vec<Profile>,
}

impl ProfileList {
    #[must_use]
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Adds an inactive profile.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed name is empty or
    /// already taken.
    pub fn add_profile(&mut self, name: &str) -> Result<&Profile, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "profile name must not be empty".to_owned(),
            ));
        }
        if self.get(name).is_some() {
            return Err(DomainError::Validation(format!(
                "profile '{name}' already exists"
            )));
        }
        self.profiles.push(Profile::new(name));
        self.profiles
            .last()
            .ok_or_else(|| DomainError::Infrastructure("profile list is empty".to_owned()))
    }

    /// Makes `name` the only active profile.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProfileNotFound` if no profile has this name;
    /// the list is left unchanged.
    pub fn switch_active(&mut self, name: &str) -> Result<(), DomainError> {
        if self.get(name).is_none() {
            return Err(DomainError::ProfileNotFound(name.to_owned()));
        }
        for profile in &mut self.profiles {
            profile.active = profile.name == name;
        }
        Ok(())
    }

    /// The active profile, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.active)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Merges `result` into the active profile and returns the updated list.
    /// If a stored list marks several profiles active, only the first one
    /// (the one [`Self::active`] returns) is updated.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProfileNotFound` if a result is given but no
    /// profile is active.
    pub fn record_result(self, result: Option<&ExamResult>) -> Result<Self, DomainError> {
        if result.is_none() {
            return Ok(self);
        }
        let Some(index) = self.profiles.iter().position(|p| p.active) else {
            return Err(DomainError::ProfileNotFound("no active profile".to_owned()));
        };
        let mut profiles = self.profiles;
        profiles[index] = merge_result(profiles[index].clone(), result);
        Ok(Self { profiles })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

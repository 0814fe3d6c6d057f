use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::content::Repository;
use crate::data_models::Farm;
use crate::error::LeadError;

/// What the contact form posts.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    /// Farm the visitor enquired about, if any.
    #[serde(default)]
    pub farm_id: Option<String>,
}

impl ContactSubmission {
    pub fn validate(&self, farms: &Repository<Farm>) -> Result<(), LeadError> {
        if self.name.trim().is_empty() {
            return Err(LeadError::MissingName);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(LeadError::InvalidEmail(self.email.clone()));
        }
        if self.message.trim().is_empty() {
            return Err(LeadError::MissingMessage);
        }
        if let Some(phone) = self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');
            if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
                return Err(LeadError::InvalidPhone(phone.to_string()));
            }
        }
        if let Some(farm_id) = &self.farm_id {
            if !farms.exists(farm_id) {
                return Err(LeadError::UnknownFarm(farm_id.clone()));
            }
        }
        Ok(())
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub submission: ContactSubmission,
    pub received_at: DateTime<Utc>,
}

pub const DEFAULT_LEADS_CAPACITY: usize = 500;

/// The most recent leads received since startup, at most `capacity` of them.
/// Nothing is persisted; older leads are evicted first.
#[derive(Debug)]
pub struct LeadInbox {
    leads: DashMap<String, Lead>,
    // arrival order, oldest first
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl Default for LeadInbox {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LEADS_CAPACITY)
    }
}

impl LeadInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            leads: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn submit(
        &self,
        submission: ContactSubmission,
        farms: &Repository<Farm>,
    ) -> Result<Lead, LeadError> {
        submission.validate(farms)?;

        let lead = Lead {
            id: nanoid::nanoid!(),
            submission,
            received_at: Utc::now(),
        };
        log::info!(
            "Received lead {} (farm: {})",
            lead.id,
            lead.submission.farm_id.as_deref().unwrap_or("-")
        );
        self.store(&lead);
        Ok(lead)
    }

    fn store(&self, lead: &Lead) {
        if self.capacity == 0 {
            return;
        }
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        while order.len() >= self.capacity {
            match order.pop_front() {
                Some(oldest) => {
                    self.leads.remove(&oldest);
                    log::debug!("Evicted lead {oldest}");
                }
                None => break,
            }
        }
        order.push_back(lead.id.clone());
        self.leads.insert(lead.id.clone(), lead.clone());
    }

    pub fn get(&self, id: &str) -> Option<Lead> {
        self.leads.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: Some("+91 98450 12345".to_string()),
            subject: None,
            message: "Interested in a plot".to_string(),
            farm_id: None,
        }
    }

    fn no_farms() -> Repository<Farm> {
        Repository::new(Vec::new()).unwrap()
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b..c"));
        assert!(!is_valid_email("a@b.c."));
        assert!(!is_valid_email("a@.b.c"));
        assert!(is_valid_email("a@mail.b.co"));
    }

    #[test]
    fn test_valid_submission_is_stored() {
        let inbox = LeadInbox::new();
        let lead = inbox.submit(submission(), &no_farms()).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.get(&lead.id), Some(lead));
    }

    #[test]
    fn test_inbox_keeps_most_recent_up_to_capacity() {
        let farms = no_farms();
        let inbox = LeadInbox::with_capacity(3);

        let ids: Vec<String> = (0..10)
            .map(|_| inbox.submit(submission(), &farms).unwrap().id)
            .collect();

        assert_eq!(inbox.len(), 3);
        assert!(ids[..7].iter().all(|id| inbox.get(id).is_none()));
        assert!(ids[7..].iter().all(|id| inbox.get(id).is_some()));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let inbox = LeadInbox::with_capacity(0);
        assert!(inbox.submit(submission(), &no_farms()).is_ok());
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_rejections() {
        let farms = no_farms();
        let inbox = LeadInbox::new();

        let mut s = submission();
        s.name = "  ".to_string();
        assert_eq!(inbox.submit(s, &farms), Err(LeadError::MissingName));

        let mut s = submission();
        s.phone = Some("call me".to_string());
        assert!(matches!(inbox.submit(s, &farms), Err(LeadError::InvalidPhone(_))));

        let mut s = submission();
        s.farm_id = Some("nope".to_string());
        assert_eq!(
            inbox.submit(s, &farms),
            Err(LeadError::UnknownFarm("nope".to_string()))
        );

        assert!(inbox.is_empty());
    }
}

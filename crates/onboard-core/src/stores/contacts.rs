//! Contact directory store
//!
//! People and customer accounts live as YAML frontmatter records inside
//! markdown files under the documents root. A file may carry several records;
//! the `type` field selects the record shape. Loading is resilient: malformed
//! blocks or unreadable files are logged and skipped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;

use super::frontmatter::extract_yaml_blocks;

/// A person in the contact directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub role: String,
    pub email: String,
    pub department: Option<String>,
    pub areas: Vec<String>,
    pub timezone: Option<String>,
    pub languages: Vec<String>,
    pub availability: Option<String>,
    pub hotline: Option<String>,
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl Default for Person {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: String::new(),
            email: String::new(),
            department: None,
            areas: Vec::new(),
            timezone: None,
            languages: Vec::new(),
            availability: None,
            hotline: None,
            source_path: PathBuf::new(),
        }
    }
}

impl Person {
    fn is_helpdesk(&self) -> bool {
        let role = self.role.to_lowercase();
        let name = self.name.to_lowercase();
        role.contains("helpdesk") || name.contains("helpdesk")
    }

    fn is_it(&self) -> bool {
        self.department
            .as_deref()
            .map(|d| d.to_lowercase().contains("it"))
            .unwrap_or(false)
    }
}

/// A customer account record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub name: String,
    pub domain: Option<String>,
    pub account_manager: Option<String>,
    pub sla: Option<String>,
    pub timezone: Option<String>,
    pub contacts: Vec<serde_json::Value>,
    #[serde(skip)]
    pub source_path: PathBuf,
}

/// In-memory contact directory loaded from frontmatter records
#[derive(Debug, Default)]
pub struct ContactsStore {
    people: Vec<Person>,
    customers: Vec<Customer>,
}

impl ContactsStore {
    /// Load all records from `*.md` files under the given root
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut store = Self::default();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        {
            let path = entry.path();
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable contact file");
                    continue;
                }
            };
            for block in extract_yaml_blocks(&text) {
                store.ingest_block(block, path);
            }
        }

        debug!(
            people = store.people.len(),
            customers = store.customers.len(),
            root = %root.display(),
            "contact directory loaded"
        );
        Ok(store)
    }

    /// Build a store from already-parsed records (tests and fixtures)
    pub fn from_records(people: Vec<Person>, customers: Vec<Customer>) -> Self {
        Self { people, customers }
    }

    fn ingest_block(&mut self, block: serde_yml::Value, path: &Path) {
        let kind = block
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "person" => match serde_yml::from_value::<Person>(block) {
                Ok(mut person) => {
                    person.source_path = path.to_path_buf();
                    self.people.push(person);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed person record");
                }
            },
            "customer" => match serde_yml::from_value::<Customer>(block) {
                Ok(mut customer) => {
                    customer.source_path = path.to_path_buf();
                    self.customers.push(customer);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed customer record");
                }
            },
            other => {
                debug!(path = %path.display(), kind = other, "ignoring frontmatter block");
            }
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Find people by role and/or expertise area
    ///
    /// Both filters are case-insensitive substring matches and compose as
    /// AND. With no filters, everyone matches.
    pub fn find_people(&self, role: Option<&str>, area: Option<&str>) -> Vec<&Person> {
        let role = role.map(|r| r.to_lowercase());
        let area = area.map(|a| a.to_lowercase());

        self.people
            .iter()
            .filter(|p| {
                let role_ok = role
                    .as_deref()
                    .map(|r| p.role.to_lowercase().contains(r))
                    .unwrap_or(true);
                let area_ok = area
                    .as_deref()
                    .map(|a| p.areas.iter().any(|pa| pa.to_lowercase().contains(a)))
                    .unwrap_or(true);
                role_ok && area_ok
            })
            .collect()
    }

    /// Find a customer by exact name, falling back to exact domain
    ///
    /// Both comparisons are case-insensitive; name wins when both are given.
    pub fn find_customer(&self, name: Option<&str>, domain: Option<&str>) -> Option<&Customer> {
        if let Some(name) = name {
            let name = name.to_lowercase();
            if let Some(hit) = self
                .customers
                .iter()
                .find(|c| c.name.to_lowercase() == name)
            {
                return Some(hit);
            }
        }
        if let Some(domain) = domain {
            let domain = domain.to_lowercase();
            return self
                .customers
                .iter()
                .find(|c| c.domain.as_deref().is_some_and(|d| d.to_lowercase() == domain));
        }
        None
    }

    /// Rank people likely to help with an issue or system
    ///
    /// The search key is `system` when present, otherwise `issue`. Scoring:
    /// +1.0 per area that overlaps the key as a substring in either
    /// direction, +0.5 for IT department members. Only people with a
    /// positive score are ranked; the top 3 are returned with helpdesk
    /// contacts force-appended, capped at 5.
    pub fn suggest_support(&self, issue: Option<&str>, system: Option<&str>) -> Vec<&Person> {
        let key = system.or(issue).unwrap_or_default().trim().to_lowercase();

        let mut scored: Vec<(f32, &Person)> = self
            .people
            .iter()
            .map(|p| {
                let mut score = 0.0f32;
                if !key.is_empty() {
                    for area in &p.areas {
                        let area = area.to_lowercase();
                        if area.contains(&key) || key.contains(area.as_str()) {
                            score += 1.0;
                        }
                    }
                }
                if p.is_it() {
                    score += 0.5;
                }
                (score, p)
            })
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut result: Vec<&Person> = scored.into_iter().take(3).map(|(_, p)| p).collect();

        // Helpdesk is always in the answer even when it scored zero
        for p in self.people.iter().filter(|p| p.is_helpdesk()) {
            if !result.iter().any(|r| r.email == p.email) {
                result.push(p);
            }
        }

        result.truncate(5);
        result
    }

    /// Best IT contact for access requests
    ///
    /// Prefers a helpdesk entry carrying a hotline, then any helpdesk entry,
    /// then anyone in the IT department. Returns `None` only when the
    /// directory has no plausible candidate at all.
    pub fn it_contact(&self) -> Option<&Person> {
        self.people
            .iter()
            .find(|p| p.is_helpdesk() && p.hotline.is_some())
            .or_else(|| self.people.iter().find(|p| p.is_helpdesk()))
            .or_else(|| self.people.iter().find(|p| p.is_it()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn person(name: &str, role: &str, email: &str, dept: Option<&str>, areas: &[&str]) -> Person {
        Person {
            name: name.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            department: dept.map(String::from),
            areas: areas.iter().map(|s| s.to_string()).collect(),
            ..Person::default()
        }
    }

    fn sample_store() -> ContactsStore {
        ContactsStore::from_records(
            vec![
                person(
                    "Lan Tran",
                    "Backend Engineer",
                    "lan@corp.vn",
                    Some("Engineering"),
                    &["kubernetes", "postgres"],
                ),
                person(
                    "Minh Vu",
                    "IT Helpdesk",
                    "helpdesk@corp.vn",
                    Some("IT"),
                    &["vpn", "accounts"],
                ),
                person(
                    "Chi Ngo",
                    "SRE",
                    "chi@corp.vn",
                    Some("IT"),
                    &["kubernetes"],
                ),
            ],
            vec![Customer {
                name: "Acme".to_string(),
                domain: Some("acme.com".to_string()),
                ..Customer::default()
            }],
        )
    }

    #[test]
    fn loads_records_and_skips_bad_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "---\ntype: person\nname: Lan Tran\nrole: Engineer\nemail: lan@corp.vn\n---\n\n---\n: broken [\n---\n\n---\ntype: customer\nname: Acme\ndomain: acme.com\n---"
        )
        .unwrap();

        let store = ContactsStore::load(dir.path()).unwrap();
        assert_eq!(store.people().len(), 1);
        assert_eq!(store.customers().len(), 1);
        assert_eq!(store.people()[0].name, "Lan Tran");
    }

    #[test]
    fn find_people_composes_filters() {
        let store = sample_store();
        let hits = store.find_people(Some("engineer"), Some("kube"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Lan Tran");

        // Filter-less query returns everyone
        assert_eq!(store.find_people(None, None).len(), 3);
    }

    #[test]
    fn find_customer_prefers_name() {
        let store = sample_store();
        assert!(store.find_customer(Some("ACME"), None).is_some());
        assert!(store.find_customer(None, Some("Acme.COM")).is_some());
        assert!(store.find_customer(Some("nobody"), None).is_none());
    }

    #[test]
    fn suggest_support_appends_helpdesk() {
        let store = sample_store();
        let hits = store.suggest_support(None, Some("kubernetes"));
        assert!(hits.iter().any(|p| p.name == "Minh Vu"));
        // Area specialists outrank the helpdesk fallback
        assert!(hits[0].areas.iter().any(|a| a == "kubernetes"));
        assert!(hits.len() <= 5);
    }

    #[test]
    fn suggest_support_excludes_zero_score_people() {
        let store = ContactsStore::from_records(
            vec![
                person("An Pham", "Designer", "an@corp.vn", Some("Design"), &["figma"]),
                person("Binh Le", "Recruiter", "binh@corp.vn", Some("HR"), &["hiring"]),
                person("Cuc Dao", "Accountant", "cuc@corp.vn", Some("Finance"), &["payroll"]),
                person("Minh Vu", "IT Helpdesk", "helpdesk@corp.vn", Some("IT"), &["vpn"]),
            ],
            Vec::new(),
        );

        // Nobody's expertise overlaps the key; only the helpdesk (ranked via
        // its IT bonus) comes back, never the irrelevant contacts.
        let hits = store.suggest_support(None, Some("kubernetes"));
        let emails: Vec<&str> = hits.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(emails, vec!["helpdesk@corp.vn"]);
    }

    #[test]
    fn suggest_support_without_key_still_answers() {
        let store = sample_store();
        let hits = store.suggest_support(None, None);
        assert!(!hits.is_empty());
        assert!(hits.iter().any(|p| p.name == "Minh Vu"));
    }

    #[test]
    fn it_contact_prefers_helpdesk_hotline() {
        let mut people = sample_store().people().to_vec();
        people[1].hotline = Some("+84 28 1234".to_string());
        let store = ContactsStore::from_records(people, Vec::new());

        let contact = store.it_contact().unwrap();
        assert_eq!(contact.email, "helpdesk@corp.vn");
        assert!(contact.hotline.is_some());
    }

    #[test]
    fn it_contact_falls_back_to_it_department() {
        let store = ContactsStore::from_records(
            vec![person("Chi Ngo", "SRE", "chi@corp.vn", Some("IT"), &[])],
            Vec::new(),
        );
        assert_eq!(store.it_contact().unwrap().name, "Chi Ngo");
    }
}

use serde::{Deserialize, Serialize};

/// A candidate record as returned by the applicant-tracking API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "homePhone")]
    pub home_phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub workflow_state: Option<String>,
    #[serde(default)]
    pub e_id: Option<String>,
}

impl Candidate {
    pub fn workflow_state(&self) -> Option<&str> {
        self.application
            .as_ref()
            .and_then(|app| app.workflow_state.as_deref())
    }

    pub fn application_id(&self) -> Option<&str> {
        self.application
            .as_ref()
            .and_then(|app| app.e_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn in_workflow_state<S: AsRef<str>>(&self, states: &[S]) -> bool {
        match self.workflow_state() {
            Some(state) => states.iter().any(|allowed| allowed.as_ref() == state),
            None => false,
        }
    }

    /// Label used in logs when a candidate has no email.
    pub fn label(&self) -> &str {
        self.email
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("No email")
    }
}

pub fn filter_by_workflow_state<S: AsRef<str>>(
    candidates: Vec<Candidate>,
    states: &[S],
) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.in_workflow_state(states))
        .collect()
}

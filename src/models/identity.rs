use serde::{Deserialize, Serialize};

/// Identity of the signed-in faculty member, supplied by the session
/// provider. The login protocol itself lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FacultyIdentity {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl FacultyIdentity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

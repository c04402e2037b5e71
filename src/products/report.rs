#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Summary of one batch renewal cycle
pub struct CycleReport {
    /// Domains evaluated
    pub checked: usize,

    /// Domains that qualified for a renewal attempt
    pub eligible: usize,

    /// Renewals that succeeded
    pub renewed: usize,

    /// Renewals that failed
    pub failed: usize,

    /// Domains skipped with a reason
    pub skipped: usize,
}


/// Implement JSON serialization on .to_string():
impl ToString for CycleReport {
    fn to_string(&self) -> String {
        serde_json::to_string(&self)
            .unwrap_or_else(|_| String::from("{\"status\": \"CycleReport serialization failure\"}"))
    }
}

use tracing::{info, warn};

use crate::model::company::Company;
use crate::repository::{CompanyRepository, RepoError};

/// Read-only view of the company's check-in allow-list.
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    ip_addresses: Vec<String>,
}

impl CompanyDirectory {
    pub fn new(ip_addresses: Vec<String>) -> Self {
        Self { ip_addresses }
    }

    /// Exact, case-sensitive match against the allow-list.
    pub fn is_allowed(&self, ip_address: &str) -> bool {
        self.ip_addresses.iter().any(|ip| ip == ip_address)
    }

    #[cfg(test)]
    pub fn ip_addresses(&self) -> &[String] {
        &self.ip_addresses
    }

    /// Loads the directory from the first company record. A missing record yields an empty
    /// directory, which refuses every check-in.
    pub async fn load(repo: &dyn CompanyRepository) -> Result<Self, RepoError> {
        match repo.find_first().await? {
            Some(Company {
                name, ip_addresses, ..
            }) => {
                info!(company = %name, allowed = ip_addresses.len(), "Company directory loaded");
                Ok(Self::new(ip_addresses))
            }
            None => {
                warn!("No company record found, every check-in will be refused");
                Ok(Self::default())
            }
        }
    }
}

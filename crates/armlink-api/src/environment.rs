use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The Azure cloud an account lives in.
///
/// Determines the Resource Manager endpoint and the access-environment label
/// used to build region global ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CloudEnvironment {
    /// Public Azure (`management.azure.com`).
    #[default]
    Public,
    /// Azure operated by 21Vianet (`management.chinacloudapi.cn`).
    China,
    /// Azure Germany (`management.microsoftazure.de`).
    German,
    /// Azure US Government (`management.usgovcloudapi.net`).
    UsGovernment,
}

impl CloudEnvironment {
    /// Resource Manager endpoint for this cloud.
    pub fn resource_manager_endpoint(&self) -> &'static str {
        match self {
            Self::Public => "https://management.azure.com/",
            Self::China => "https://management.chinacloudapi.cn/",
            Self::German => "https://management.microsoftazure.de/",
            Self::UsGovernment => "https://management.usgovcloudapi.net/",
        }
    }

    /// Access-environment label, the first segment of a region global id.
    pub fn access_env(&self) -> &'static str {
        match self {
            Self::Public => "azure-int",
            Self::China => "azure-cn",
            Self::German => "azure-de",
            Self::UsGovernment => "azure-us-gov",
        }
    }

    /// Portal URL for humans.
    pub fn portal_url(&self) -> &'static str {
        match self {
            Self::China => "https://portal.azure.cn",
            Self::German => "https://portal.microsoftazure.de",
            Self::UsGovernment => "https://portal.azure.us",
            Self::Public => "https://portal.azure.com",
        }
    }

    /// Canonical environment name as used by Azure SDKs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Public => "AzurePublicCloud",
            Self::China => "AzureChinaCloud",
            Self::German => "AzureGermanCloud",
            Self::UsGovernment => "AzureUSGovernmentCloud",
        }
    }
}

impl fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CloudEnvironment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "azurepubliccloud" | "azureglobalcloud" | "public" | "global" => Ok(Self::Public),
            "azurechinacloud" | "china" => Ok(Self::China),
            "azuregermancloud" | "german" => Ok(Self::German),
            "azureusgovernmentcloud" | "usgovernment" | "usgov" => Ok(Self::UsGovernment),
            other => Err(crate::Error::InvalidRequest {
                message: format!("unknown Azure environment '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_sdk_names_case_insensitively() {
        assert_eq!(
            "AzureChinaCloud".parse::<CloudEnvironment>().unwrap(),
            CloudEnvironment::China
        );
        assert_eq!(
            "azureglobalcloud".parse::<CloudEnvironment>().unwrap(),
            CloudEnvironment::Public
        );
        assert!("moon".parse::<CloudEnvironment>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for env in [
            CloudEnvironment::Public,
            CloudEnvironment::China,
            CloudEnvironment::German,
            CloudEnvironment::UsGovernment,
        ] {
            assert_eq!(env.to_string().parse::<CloudEnvironment>().unwrap(), env);
        }
    }
}

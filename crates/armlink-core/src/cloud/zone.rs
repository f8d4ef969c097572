use async_trait::async_trait;

use super::{Host, STATUS_AVAILABLE, Wire};
use crate::capability::{CloudHost, CloudResource, CloudWire, CloudZone};
use crate::error::CoreError;
use crate::region::Region;

/// The single availability zone Azure regions expose here.
#[derive(Debug, Clone)]
pub struct Zone {
    region: Region,
}

impl Zone {
    pub(crate) fn new(region: Region) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn host(&self) -> Host {
        Host::new(self.clone())
    }

    /// One wire per virtual network, modern and classic.
    pub async fn wires(&self) -> Result<Vec<Wire>, CoreError> {
        let mut wires: Vec<Wire> = self
            .region
            .list_vpcs()
            .await?
            .into_iter()
            .map(|vpc| vpc.wire())
            .collect();
        wires.extend(
            self.region
                .list_classic_vpcs()
                .await?
                .into_iter()
                .map(|vpc| vpc.wire()),
        );
        Ok(wires)
    }
}

impl CloudResource for Zone {
    fn id(&self) -> String {
        self.region.name().to_owned()
    }

    fn name(&self) -> String {
        self.region.name().to_owned()
    }

    fn global_id(&self) -> String {
        self.region.global_id()
    }

    fn status(&self) -> String {
        STATUS_AVAILABLE.to_owned()
    }

    fn is_emulated(&self) -> bool {
        true
    }
}

#[async_trait]
impl CloudZone for Zone {
    async fn hosts(&self) -> Result<Vec<Box<dyn CloudHost>>, CoreError> {
        Ok(vec![Box::new(self.host())])
    }

    async fn wires(&self) -> Result<Vec<Box<dyn CloudWire>>, CoreError> {
        Ok(Zone::wires(self)
            .await?
            .into_iter()
            .map(|w| Box::new(w) as Box<dyn CloudWire>)
            .collect())
    }
}

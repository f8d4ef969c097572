// ── App service plans, sites and certificates ──

use armlink_api::api_version;
use armlink_api::types::{AppServicePlan, Certificate, Site};

use crate::cloud::AppSite;
use crate::error::CoreError;
use crate::model::AppCertificate;
use crate::region::Region;

pub(crate) const SERVER_FARM_TYPE: &str = "Microsoft.Web/serverFarms";
pub(crate) const SITE_TYPE: &str = "Microsoft.Web/sites";
pub(crate) const CERTIFICATE_TYPE: &str = "Microsoft.Web/certificates";

impl Region {
    pub async fn list_app_service_plans(&self) -> Result<Vec<AppServicePlan>, CoreError> {
        self.list_located(SERVER_FARM_TYPE, &[]).await
    }

    pub async fn get_app_service_plan(&self, id: &str) -> Result<AppServicePlan, CoreError> {
        self.client()
            .get(id, &[])
            .await
            .map_err(|e| CoreError::request("get app service plan", id, e))
    }

    /// Plan by id through the region's cache. The first call lists every
    /// plan in the region; ids the listing did not return are fetched
    /// directly.
    pub async fn app_service_plan(&self, id: &str) -> Result<AppServicePlan, CoreError> {
        if id.is_empty() {
            return Err(CoreError::not_found("app service plan", id));
        }
        match self
            .plans()
            .lookup(id, || self.list_app_service_plans())
            .await?
        {
            Some(plan) => Ok(plan),
            None => self.get_app_service_plan(id).await,
        }
    }

    pub async fn list_app_sites(&self) -> Result<Vec<AppSite>, CoreError> {
        let sites: Vec<Site> = self
            .list_located(SITE_TYPE, &[("api-version", api_version::WEB)])
            .await?;
        Ok(sites
            .into_iter()
            .map(|site| AppSite::new(self.clone(), site))
            .collect())
    }

    pub async fn get_app_site(&self, id: &str) -> Result<AppSite, CoreError> {
        let site: Site = self
            .client()
            .show(id, api_version::WEB)
            .await
            .map_err(|e| CoreError::request("get site", id, e))?;
        Ok(AppSite::new(self.clone(), site))
    }

    /// Certificates uploaded to a server farm.
    pub async fn list_app_certificates(
        &self,
        server_farm_id: &str,
    ) -> Result<Vec<AppCertificate>, CoreError> {
        let filter = format!("ServerFarmId eq '{server_farm_id}'");
        let certs: Vec<Certificate> = self
            .client()
            .list(
                CERTIFICATE_TYPE,
                &[("$filter", filter.as_str()), ("api-version", api_version::WEB)],
            )
            .await
            .map_err(|e| CoreError::request("list certificates", server_farm_id, e))?;
        Ok(certs.into_iter().map(AppCertificate::from).collect())
    }
}

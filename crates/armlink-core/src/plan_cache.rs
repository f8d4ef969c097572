// ── App service plan cache ──
//
// Sites reference their plan by server-farm id. Resolving every site's plan
// with its own GET is wasteful, so a region lists its plans once and answers
// later lookups from that map. Concurrent first lookups share a single
// listing; a failed listing leaves the cache empty for the next caller.

use std::collections::HashMap;
use std::future::Future;

use armlink_api::types::AppServicePlan;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug, Default)]
pub(crate) struct PlanCache {
    plans: OnceCell<HashMap<String, AppServicePlan>>,
}

impl PlanCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Look up a plan by id, populating the map with `load` on first use.
    ///
    /// Returns `Ok(None)` on a miss; the caller decides how to fall back.
    pub(crate) async fn lookup<F, Fut>(
        &self,
        id: &str,
        load: F,
    ) -> Result<Option<AppServicePlan>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<AppServicePlan>, CoreError>>,
    {
        let plans = self
            .plans
            .get_or_try_init(|| async {
                let plans = load().await?;
                debug!(count = plans.len(), "app service plan cache populated");
                Ok::<_, CoreError>(
                    plans
                        .into_iter()
                        .map(|plan| (plan.id.to_lowercase(), plan))
                        .collect(),
                )
            })
            .await?;
        Ok(plans.get(&id.to_lowercase()).cloned())
    }

    pub(crate) fn is_populated(&self) -> bool {
        self.plans.initialized()
    }
}

// ── Network security groups ──
//
// Rule edits are read-modify-write on the whole group document: each edit
// re-reads the group by id, changes its rule list and PUTs it back, so two
// edits never start from a stale copy held by this value.

use armlink_api::types::{NetworkInterface, NetworkSecurityGroup, SubResource, Subnet};
use async_trait::async_trait;
use tracing::{debug, info};

use super::provisioning_status;
use crate::capability::{CloudResource, CloudSecurityGroup};
use crate::convert::{rule_from_arm, rule_to_arm};
use crate::error::CoreError;
use crate::model::SecurityRuleSpec;
use crate::region::Region;

#[derive(Debug, Clone)]
pub struct SecurityGroup {
    region: Region,
    doc: NetworkSecurityGroup,
}

impl SecurityGroup {
    pub(crate) fn new(region: Region, doc: NetworkSecurityGroup) -> Self {
        Self { region, doc }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn id(&self) -> &str {
        &self.doc.id
    }

    pub fn name(&self) -> &str {
        &self.doc.name
    }

    pub fn location(&self) -> &str {
        &self.doc.location
    }

    pub fn document(&self) -> &NetworkSecurityGroup {
        &self.doc
    }

    /// User rules in ARM order.
    pub fn rules(&self) -> Vec<SecurityRuleSpec> {
        self.doc
            .properties
            .security_rules
            .iter()
            .map(rule_from_arm)
            .collect()
    }

    /// The platform rules every group carries.
    pub fn default_rules(&self) -> Vec<SecurityRuleSpec> {
        self.doc
            .properties
            .default_security_rules
            .iter()
            .map(rule_from_arm)
            .collect()
    }

    async fn fetch(&self) -> Result<NetworkSecurityGroup, CoreError> {
        self.region
            .client()
            .get(self.id(), &[])
            .await
            .map_err(|e| CoreError::request("get security group", self.id(), e))
    }

    async fn store(&self, doc: &NetworkSecurityGroup) -> Result<(), CoreError> {
        self.region
            .client()
            .update::<NetworkSecurityGroup>(doc)
            .await
            .map_err(|e| CoreError::request("update security group", self.id(), e))?;
        Ok(())
    }

    /// Add a rule. A rule already present under the same name is replaced.
    pub async fn create_rule(&self, rule: &SecurityRuleSpec) -> Result<(), CoreError> {
        let mut doc = self.fetch().await?;
        let arm = rule_to_arm(rule);
        let rules = &mut doc.properties.security_rules;
        match rules.iter_mut().find(|r| r.name.eq_ignore_ascii_case(&arm.name)) {
            Some(existing) => *existing = arm,
            None => rules.push(arm),
        }
        self.store(&doc).await
    }

    /// Replace the rule called `name`, keeping that name.
    pub async fn update_rule(&self, name: &str, rule: &SecurityRuleSpec) -> Result<(), CoreError> {
        let mut doc = self.fetch().await?;
        let slot = doc
            .properties
            .security_rules
            .iter_mut()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::not_found("security rule", name))?;
        let mut arm = rule_to_arm(rule);
        arm.name = slot.name.clone();
        *slot = arm;
        self.store(&doc).await
    }

    /// Remove the rule called `name`. Removing a missing rule is a no-op.
    pub async fn delete_rule(&self, name: &str) -> Result<(), CoreError> {
        let mut doc = self.fetch().await?;
        let before = doc.properties.security_rules.len();
        doc.properties
            .security_rules
            .retain(|r| !r.name.eq_ignore_ascii_case(name));
        if doc.properties.security_rules.len() == before {
            debug!(group = %self.id(), rule = name, "rule already absent");
            return Ok(());
        }
        self.store(&doc).await
    }

    /// Write this group into every NIC of a VM.
    pub async fn attach_to_instance(&self, instance_id: &str) -> Result<(), CoreError> {
        let instance = self.region.get_instance(instance_id).await?;
        for nic_id in instance.nic_ids() {
            let mut nic = self.region.get_network_interface(&nic_id).await?;
            nic.properties.network_security_group = Some(SubResource::new(self.id()));
            self.put_nic(&nic).await?;
        }
        info!(group = %self.id(), instance = instance_id, "security group attached");
        Ok(())
    }

    async fn put_nic(&self, nic: &NetworkInterface) -> Result<(), CoreError> {
        self.region
            .client()
            .update::<NetworkInterface>(nic)
            .await
            .map_err(|e| CoreError::request("update network interface", &nic.id, e))?;
        Ok(())
    }

    /// Detach from every NIC, then every subnet, then delete the group.
    /// Attachments come from a fresh read, not the held document.
    pub async fn delete(&self) -> Result<(), CoreError> {
        let fresh = self.fetch().await?;
        let nics = fresh.properties.network_interfaces.unwrap_or_default();
        let subnets = fresh.properties.subnets.unwrap_or_default();

        for nic_ref in &nics {
            let mut nic = self.region.get_network_interface(&nic_ref.id).await?;
            nic.properties.network_security_group = None;
            self.put_nic(&nic).await?;
            debug!(group = %self.id(), nic = %nic_ref.id, "detached from interface");
        }

        let client = self.region.client();
        for subnet_ref in &subnets {
            let mut subnet: Subnet = client
                .get(&subnet_ref.id, &[])
                .await
                .map_err(|e| CoreError::request("get subnet", &subnet_ref.id, e))?;
            subnet.properties.network_security_group = None;
            client
                .update::<Subnet>(&subnet)
                .await
                .map_err(|e| CoreError::request("update subnet", &subnet_ref.id, e))?;
            debug!(group = %self.id(), subnet = %subnet_ref.id, "detached from subnet");
        }

        client
            .del(self.id())
            .await
            .map_err(|e| CoreError::request("delete security group", self.id(), e))?;
        info!(group = %self.id(), "security group deleted");
        Ok(())
    }
}

impl CloudResource for SecurityGroup {
    fn id(&self) -> String {
        self.doc.id.clone()
    }

    fn name(&self) -> String {
        self.doc.name.clone()
    }

    fn status(&self) -> String {
        provisioning_status(&self.doc.properties.provisioning_state)
    }
}

#[async_trait]
impl CloudSecurityGroup for SecurityGroup {
    fn rules(&self) -> Vec<SecurityRuleSpec> {
        SecurityGroup::rules(self)
    }

    async fn create_rule(&self, rule: &SecurityRuleSpec) -> Result<(), CoreError> {
        SecurityGroup::create_rule(self, rule).await
    }

    async fn update_rule(&self, name: &str, rule: &SecurityRuleSpec) -> Result<(), CoreError> {
        SecurityGroup::update_rule(self, name, rule).await
    }

    async fn delete_rule(&self, name: &str) -> Result<(), CoreError> {
        SecurityGroup::delete_rule(self, name).await
    }

    async fn delete(&self) -> Result<(), CoreError> {
        SecurityGroup::delete(self).await
    }
}

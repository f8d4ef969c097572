//! Virtual machine command handlers.

use serde::Serialize;
use tabled::Tabled;

use armlink_api::types::VmSize;
use armlink_core::{DiskConfig, Instance, Region, VmCreateConfig, generate_password};

use crate::cli::{GlobalOpts, VmCreateArgs, VmsArgs, VmsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct VmInfo {
    id: String,
    name: String,
    location: String,
    instance_type: String,
    os_type: String,
    status: String,
    power_state: Option<String>,
    nic_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    security_group_ids: Option<Vec<String>>,
}

impl From<&Instance> for VmInfo {
    fn from(vm: &Instance) -> Self {
        Self {
            id: vm.id().to_owned(),
            name: vm.name().to_owned(),
            location: vm.location().to_owned(),
            instance_type: vm.instance_type().to_owned(),
            os_type: vm.os_type().to_string(),
            status: vm.vm_status().to_string(),
            power_state: vm.power_state().map(str::to_owned),
            nic_ids: vm.nic_ids(),
            security_group_ids: None,
        }
    }
}

#[derive(Tabled)]
struct VmRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&VmInfo> for VmRow {
    fn from(v: &VmInfo) -> Self {
        Self {
            name: v.name.clone(),
            size: v.instance_type.clone(),
            os: v.os_type.clone(),
            status: v.status.clone(),
            location: v.location.clone(),
        }
    }
}

#[derive(Tabled)]
struct SizeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "vCPU")]
    cores: u32,
    #[tabled(rename = "Memory (MB)")]
    memory: u64,
    #[tabled(rename = "Max Data Disks")]
    disks: u32,
}

impl From<&VmSize> for SizeRow {
    fn from(s: &VmSize) -> Self {
        Self {
            name: s.name.clone(),
            cores: s.number_of_cores,
            memory: s.memory_in_mb,
            disks: s.max_data_disk_count,
        }
    }
}

fn detail(v: &VmInfo) -> String {
    output::detail_lines(&[
        ("ID", output::dim(&v.id)),
        ("Name", v.name.clone()),
        ("Location", v.location.clone()),
        ("Size", v.instance_type.clone()),
        ("OS", v.os_type.clone()),
        ("Status", output::paint_status(&v.status)),
        ("Power State", util::or_dash(v.power_state.as_deref())),
        ("NICs", util::join_or_dash(&v.nic_ids)),
        (
            "Security Groups",
            util::join_or_dash(v.security_group_ids.as_deref().unwrap_or_default()),
        ),
    ])
}

/// Turn CLI arguments into a create request. Returns the password too when
/// one was generated, so it can be shown once.
fn create_config(args: VmCreateArgs) -> Result<(VmCreateConfig, Option<String>), CliError> {
    let public_key = args
        .key_file
        .as_deref()
        .map(std::fs::read_to_string)
        .transpose()?
        .map(|k| k.trim().to_owned());
    let (password, generated) = match args.password.filter(|p| !p.is_empty()) {
        Some(p) => (p, None),
        None => {
            let p = generate_password();
            (p.clone(), Some(p))
        }
    };
    let config = VmCreateConfig {
        hostname: args.hostname,
        image_id: args.image,
        instance_type: args.instance_type,
        cpu: args.cpu,
        memory_mb: args.memory,
        sys_disk: DiskConfig::new(args.disk_type.clone(), args.disk_size),
        data_disks: args
            .data_disks
            .iter()
            .map(|size| DiskConfig::new(args.disk_type.clone(), *size))
            .collect(),
        network_id: args.network,
        ip_addr: args.ip,
        password: Some(password),
        public_key,
        user_data: args.user_data,
        security_group_ids: args.security_groups,
        resource_group: args.group,
        tags: util::parse_tags(&args.tags)?,
        name: args.name,
    };
    Ok((config, generated))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(region: &Region, args: VmsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VmsCommand::List => {
            let vms: Vec<VmInfo> = region
                .host()
                .vms()
                .await?
                .iter()
                .map(VmInfo::from)
                .collect();
            let out = output::render_list(
                &global.output,
                &vms,
                |v| VmRow::from(v),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VmsCommand::Show { id } => {
            let vm = region.get_instance(&id).await?;
            let info = VmInfo {
                security_group_ids: Some(vm.security_group_ids().await?),
                ..VmInfo::from(&vm)
            };
            let out = output::render_single(&global.output, &info, detail, |v| v.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VmsCommand::Create(create) => {
            let (config, generated) = create_config(*create)?;
            let vm = region.host().create_vm(&config).await?;
            util::report(global.quiet, &format!("VM created: {}", vm.id()));
            if let Some(password) = generated {
                // Printed even with --quiet: it cannot be recovered later
                eprintln!(
                    "Admin login: {} / {password}",
                    region.default_login_user()
                );
            }
            let info = VmInfo::from(&vm);
            let out = output::render_single(&global.output, &info, detail, |v| v.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VmsCommand::Start { id } => {
            region.get_instance(&id).await?.start().await?;
            util::report(global.quiet, "VM started");
            Ok(())
        }

        VmsCommand::Stop { id } => {
            let vm = region.get_instance(&id).await?;
            if !util::confirm(&format!("Stop and deallocate VM '{}'?", vm.name()), global.yes)? {
                return Ok(());
            }
            vm.stop().await?;
            util::report(global.quiet, "VM stopped");
            Ok(())
        }

        VmsCommand::Delete { id } => {
            let vm = region.get_instance(&id).await?;
            if !util::confirm(
                &format!("Delete VM '{}'? Its disks and NICs are kept.", vm.name()),
                global.yes,
            )? {
                return Ok(());
            }
            vm.delete().await?;
            util::report(global.quiet, "VM deleted");
            Ok(())
        }

        VmsCommand::Sizes { cpu, memory } => {
            let sizes: Vec<VmSize> = region
                .list_vm_sizes()
                .await?
                .into_iter()
                .filter(|s| cpu.is_none_or(|c| s.number_of_cores == c))
                .filter(|s| memory.is_none_or(|m| s.memory_in_mb == m))
                .collect();
            let out = output::render_list(
                &global.output,
                &sizes,
                |s| SizeRow::from(s),
                |s| s.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn create_args(extra: &[&str]) -> VmCreateArgs {
        let mut argv = vec![
            "armlink", "vms", "create", "--name", "web", "--image",
            "Canonical/UbuntuServer/18.04-LTS/latest", "--network", "/subnets/default",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Vms(VmsArgs {
                command: VmsCommand::Create(args),
            }) => *args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_password_is_generated_and_returned() {
        let (config, generated) = create_config(create_args(&[])).unwrap();
        let generated = generated.unwrap();
        assert_eq!(config.password.as_deref(), Some(generated.as_str()));
        assert_eq!(config.cpu, 1);
        assert_eq!(config.memory_mb, 1024);
        assert!(config.instance_type.is_none());
    }

    #[test]
    fn explicit_values_pass_through() {
        let (config, generated) = create_config(create_args(&[
            "--password", "Secret123abc", "--type", "Standard_B1s", "--data-disk", "64",
            "--data-disk", "128", "--tag", "env=prod", "--secgroup", "/nsg/a", "-g", "rg1",
        ]))
        .unwrap();
        assert!(generated.is_none());
        assert_eq!(config.password.as_deref(), Some("Secret123abc"));
        assert_eq!(config.instance_type.as_deref(), Some("Standard_B1s"));
        assert_eq!(config.data_disks.len(), 2);
        assert_eq!(config.data_disks[1].size_gb, 128);
        assert_eq!(config.tags["env"], "prod");
        assert_eq!(config.security_group_ids, vec!["/nsg/a".to_owned()]);
        assert_eq!(config.resource_group.as_deref(), Some("rg1"));
    }
}

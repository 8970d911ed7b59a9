//! Conversion of the loosely-typed jobs API payloads into [`Job`] values.
//!
//! Parsers are composed bottom-up: resources, then container, then job. Each
//! one is usable on its own. Conversion is all-or-nothing and never touches
//! the clock or any shared state, so the same payload always yields equal
//! values.

mod error;
mod fields;

use std::time::Duration;

use serde_json::Value;

pub use self::error::ConvertError;
use self::fields::Fields;
use crate::model::entity::*;

type Result<T> = std::result::Result<T, ConvertError>;

const MIB: u64 = 1 << 20;

/// Builds a [`Job`] from one element of the jobs API.
///
/// Unknown keys are ignored. Mandatory keys are `id`, `status`, `owner`,
/// `cluster_name`, `container` and `container.image`.
pub fn job_from_api(raw: &Value) -> Result<Job> {
    let fields = Fields::root(raw)?;

    let id = fields.str("id")?;
    let status = fields.enumeration("status")?;
    let owner = fields.str("owner")?;
    let cluster_name = fields.str("cluster_name")?;
    let container = parse_container(&fields.object("container")?)?;
    let history = parse_history(&fields, status)?;
    let schedule_timeout = parse_schedule_timeout(&fields)?;

    Ok(Job {
        id,
        name: fields.opt_str("name")?,
        org_name: fields.opt_str("org_name")?,
        project_name: fields.opt_str("project_name")?,
        owner,
        cluster_name,
        description: fields.opt_str("description")?,
        status,
        history,
        container,
        uri: fields.opt_uri("uri")?,
        http_url: fields.opt_uri("http_url")?,
        scheduler_enabled: fields.bool_or("scheduler_enabled", false)?,
        preemptible_node: fields.bool_or("preemptible_node", false)?,
        pass_config: fields.bool_or("pass_config", false)?,
        schedule_timeout,
        life_span: schedule_timeout,
        max_run_time_minutes: fields.opt_unsigned("max_run_time_minutes")?,
        total_price_credits: fields.opt_decimal("total_price_credits")?,
        price_credits_per_hour: fields.opt_decimal("price_credits_per_hour")?,
        preset_name: fields.opt_str("preset_name")?,
        internal_hostname: fields.opt_str("internal_hostname")?,
        internal_hostname_named: fields.opt_str("internal_hostname_named")?,
        restart_policy: fields.opt_enumeration("restart_policy")?.unwrap_or_default(),
        priority: fields.opt_enumeration("priority")?.unwrap_or_default(),
        tags: fields.strings("tags")?,
        materialized: fields.bool_or("materialized", false)?,
        being_dropped: fields.bool_or("being_dropped", false)?,
        logs_removed: fields.bool_or("logs_removed", false)?,
    })
}

pub fn container_from_api(raw: &Value) -> Result<Container> {
    parse_container(&Fields::root(raw)?)
}

pub fn resources_from_api(raw: &Value) -> Result<Resources> {
    parse_resources(&Fields::root(raw)?)
}

/// `schedule_timeout` is authoritative, `life_span` is its legacy name.
fn parse_schedule_timeout(fields: &Fields) -> Result<Option<Duration>> {
    let schedule_timeout = fields.opt_seconds("schedule_timeout")?;
    let life_span = fields.opt_seconds("life_span")?;
    match (schedule_timeout, life_span) {
        (Some(timeout), Some(span)) if timeout != span => Err(fields.mismatch(
            "life_span",
            "the same value as `schedule_timeout`",
            span.as_secs_f64().to_string(),
        )),
        (timeout, span) => Ok(timeout.or(span)),
    }
}

fn parse_history(fields: &Fields, job_status: JobStatus) -> Result<JobStatusHistory> {
    let transitions = fields
        .items("statuses")?
        .iter()
        .map(parse_status_item)
        .collect::<Result<Vec<_>>>()?;

    let Some(history) = fields.opt_object("history")? else {
        return Ok(JobStatusHistory::empty(job_status, transitions));
    };

    Ok(JobStatusHistory {
        status: history.opt_enumeration("status")?.unwrap_or(job_status),
        created_at: history.opt_datetime("created_at")?,
        started_at: history.opt_datetime("started_at")?,
        finished_at: history.opt_datetime("finished_at")?,
        run_time_seconds: history.opt_f64("run_time_seconds")?.unwrap_or_default(),
        restarts: history.opt_unsigned("restarts")?.unwrap_or_default(),
        transitions,
    })
}

fn parse_status_item(fields: &Fields) -> Result<JobStatusItem> {
    Ok(JobStatusItem {
        status: fields.enumeration("status")?,
        reason: fields.opt_str("reason")?,
        transition_time: fields.datetime("transition_time")?,
    })
}

fn parse_container(fields: &Fields) -> Result<Container> {
    Ok(Container {
        image: fields.str("image")?,
        command: fields.opt_str("command")?,
        entrypoint: fields.opt_str("entrypoint")?,
        working_dir: fields.opt_str("working_dir")?,
        http: fields.opt_object("http")?.as_ref().map(parse_http_port).transpose()?,
        resources: parse_resources(&fields.object("resources")?)?,
        tty: fields.bool_or("tty", false)?,
        env: fields.string_map("env")?,
        secret_env: fields.uri_map("secret_env")?,
        volumes: fields
            .items("volumes")?
            .iter()
            .map(parse_volume)
            .collect::<Result<_>>()?,
        disk_volumes: fields
            .items("disk_volumes")?
            .iter()
            .map(parse_disk_volume)
            .collect::<Result<_>>()?,
        secret_files: fields
            .items("secret_volumes")?
            .iter()
            .map(parse_secret_file)
            .collect::<Result<_>>()?,
    })
}

fn parse_http_port(fields: &Fields) -> Result<HttpPort> {
    Ok(HttpPort {
        port: fields.opt_unsigned("port")?.ok_or_else(|| fields.missing("port"))?,
        requires_auth: fields.bool_or("requires_auth", false)?,
    })
}

fn parse_volume(fields: &Fields) -> Result<Volume> {
    Ok(Volume {
        storage_uri: fields.uri("src_storage_uri")?,
        container_path: fields.str("dst_path")?,
        read_only: fields.bool_or("read_only", false)?,
    })
}

fn parse_disk_volume(fields: &Fields) -> Result<DiskVolume> {
    Ok(DiskVolume {
        disk_uri: fields.uri("src_disk_uri")?,
        container_path: fields.str("dst_path")?,
        read_only: fields.bool_or("read_only", false)?,
    })
}

fn parse_secret_file(fields: &Fields) -> Result<SecretFile> {
    Ok(SecretFile {
        secret_uri: fields.uri("src_secret_uri")?,
        container_path: fields.str("dst_path")?,
        read_only: fields.bool_or("read_only", false)?,
    })
}

fn parse_resources(fields: &Fields) -> Result<Resources> {
    let cpu = fields.f64("cpu")?;
    // Older clusters report `memory_mb` instead of bytes.
    let memory = match fields.opt_unsigned::<u64>("memory")? {
        Some(memory) => memory,
        None => {
            let mb = fields
                .opt_unsigned::<u64>("memory_mb")?
                .ok_or_else(|| fields.missing("memory"))?;
            mb.checked_mul(MIB)
                .ok_or_else(|| fields.mismatch("memory_mb", "memory size in range", mb.to_string()))?
        }
    };

    Ok(Resources {
        cpu,
        memory,
        shm: fields.bool_or("shm", false)?,
        nvidia_gpu: fields.opt_unsigned("nvidia_gpu")?,
        tpu: fields.opt_object("tpu")?.as_ref().map(parse_tpu).transpose()?,
    })
}

fn parse_tpu(fields: &Fields) -> Result<TpuResource> {
    Ok(TpuResource {
        r#type: fields.str("type")?,
        software_version: fields.str("software_version")?,
    })
}

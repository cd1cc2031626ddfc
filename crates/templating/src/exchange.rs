//! Pull objects out of Grafana and push them back in.
//!
//! Imports always overwrite. Alert rules are written with provenance
//! disabled so they stay editable in the Grafana UI.

use grafana_client::{Folder, GrafanaClient, SaveDashboardRequest, SaveDashboardResponse};
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};

/// Dashboard content and its folder (`None` for the General folder).
pub async fn export_dashboard(client: &GrafanaClient, uid: &str) -> Result<(Value, Option<Folder>)> {
    let found = client.get_dashboard(uid).await?;
    let folder = match found.meta.folder_uid.as_deref() {
        Some(folder_uid) if !folder_uid.is_empty() => Some(client.get_folder(folder_uid).await?),
        _ => None,
    };
    info!(uid, folder = ?folder.as_ref().map(|f| &f.title), "Exported dashboard");
    Ok((found.dashboard, folder))
}

/// Save `content`, overwriting any dashboard with the same uid.
pub async fn import_dashboard(
    client: &GrafanaClient,
    content: Value,
    folder: Option<&Folder>,
) -> Result<SaveDashboardResponse> {
    let request = SaveDashboardRequest {
        dashboard: content,
        overwrite: true,
        folder_uid: folder
            .filter(|f| !f.uid.is_empty())
            .map(|f| f.uid.clone()),
        folder_id: folder.map(|f| f.id),
        message: None,
    };
    let saved = client.update_dashboard(&request).await?;
    info!(uid = %saved.uid, version = ?saved.version, "Imported dashboard");
    Ok(saved)
}

/// Alert rule content and its folder.
pub async fn export_alert(client: &GrafanaClient, uid: &str) -> Result<(Value, Folder)> {
    let rule = client.get_alert_rule(uid).await?;
    let folder_uid = rule
        .get("folderUID")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Unsupported(format!("alert rule {uid} has no folderUID")))?;
    let folder = client.get_folder(folder_uid).await?;
    info!(uid, folder = %folder.title, "Exported alert rule");
    Ok((rule, folder))
}

/// Write an alert rule into `folder`.
///
/// The folder is forced and any numeric `id` dropped. A rule whose `uid`
/// already exists is updated; otherwise it is created.
pub async fn import_alert(client: &GrafanaClient, mut content: Value, folder: &Folder) -> Result<Value> {
    if let Value::Object(fields) = &mut content {
        fields.insert("folderUID".to_string(), Value::String(folder.uid.clone()));
        fields.shift_remove("id");
    }

    let uid = content
        .get("uid")
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
        .map(str::to_string);

    let exists = match &uid {
        Some(uid) => match client.get_alert_rule(uid).await {
            Ok(_) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e.into()),
        },
        None => false,
    };

    let saved = match uid {
        Some(uid) if exists => client.update_alert_rule(&uid, &content, true).await?,
        _ => client.create_alert_rule(&content, true).await?,
    };
    let saved_uid = saved.get("uid").and_then(Value::as_str).unwrap_or_default();
    info!(
        uid = saved_uid,
        folder = %folder.title,
        updated = exists,
        "Imported alert rule"
    );
    Ok(saved)
}

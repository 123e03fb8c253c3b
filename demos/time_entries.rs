#[macro_use]
extern crate tracing;

use anyhow::Result;
use clockify_rs::{Client, TimeEntryRequest, UpdateTimeEntryRequest};
use time::{Duration, OffsetDateTime};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Reads CAPI_KEY (and CLOCKIFY_BASE_URL if set)
    let client = Client::from_env()?;

    let user = client.users().current().await?.into_result()?;
    let workspace_id = user
        .active_workspace
        .clone()
        .ok_or_else(|| anyhow::anyhow!("user has no active workspace"))?;
    info!("using workspace {} for {}", workspace_id, user.email);

    let now = OffsetDateTime::now_utc();
    let created = client
        .time_entries()
        .create(&workspace_id, &TimeEntryRequest::starting_at(now))
        .await?
        .into_result()?;
    info!("created time entry: {:#?}", created);

    let update = UpdateTimeEntryRequest {
        start: Some(now - Duration::seconds(1)),
        billable: Some(true),
        ..UpdateTimeEntryRequest::default()
    };
    let updated = client
        .time_entries()
        .update(&workspace_id, &created.id, &update)
        .await?;
    info!("update successful: {}", updated.is_successful());

    let entries = client
        .time_entries()
        .find_all_for_user(&workspace_id, &user.id)
        .await?;
    if let Some(entries) = entries.data() {
        info!("found {} time entries", entries.len());
    }

    let deleted = client
        .time_entries()
        .delete(&workspace_id, &created.id)
        .await?;
    if let Some(failure) = deleted.failure() {
        error!("failed to delete {}: {}", created.id, failure);
    }

    Ok(())
}

//! Friends metric.
//!
//! Resolves the friend list to profiles in batches of
//! [`MAX_SUMMARY_BATCH`] ids. A failed batch drops only its own friends.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;
use steamtrack_core::{FriendRecord, Identity, MetricKind, MetricResult, MetricValue};
use steamtrack_fetch::{Endpoint, MAX_SUMMARY_BATCH, SteamGateway};
use tracing::{instrument, warn};

use crate::descriptor::{MetricDescriptor, minutes};
use crate::error::ReduceError;

/// Descriptor for the friends metric.
pub fn friends_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::Friends)
        .description("Friends and what they are doing")
        .interval(minutes(5))
        .sources(&[Endpoint::FriendList, Endpoint::FriendSummaries])
        .build()
}

#[derive(Debug, Serialize)]
struct FriendsAttributes {
    friends: Vec<FriendRecord>,
}

/// Value is the number of friends resolved.
///
/// Friends are listed in friend-list order, whatever order the summary
/// batches return them in.
#[instrument(skip_all)]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
) -> Result<MetricResult, ReduceError> {
    let entries = gateway.friend_list(identity).await?;
    if entries.is_empty() {
        return Ok(MetricResult::new(0i64).with_attribute("friends", json!([])));
    }

    let ids: Vec<String> = entries.into_iter().map(|e| e.steam_id).collect();

    let mut resolved: HashMap<String, FriendRecord> = HashMap::with_capacity(ids.len());
    for (index, batch) in ids.chunks(MAX_SUMMARY_BATCH).enumerate() {
        match gateway.friend_summaries(identity, batch).await {
            Ok(summaries) => {
                for summary in &summaries {
                    resolved.insert(summary.steam_id.clone(), FriendRecord::from(summary));
                }
            }
            Err(e) => {
                warn!(batch = index, size = batch.len(), error = %e, "Friend summary batch failed");
            }
        }
    }

    let friends: Vec<FriendRecord> = ids.iter().filter_map(|id| resolved.remove(id)).collect();

    let value = MetricValue::count(friends.len());
    Ok(MetricResult::new(value).with_attributes(&FriendsAttributes { friends })?)
}

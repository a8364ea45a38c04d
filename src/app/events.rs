//! Background worker messages and async data tasks.

use crate::domain::{CodeRecord, ReviewOutcome};
use crate::review::requester::ReviewClient;
use crate::store::client::StoreClient;
use crate::store::records::{fetch_code_record, upsert_code_record};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc::UnboundedSender;

/// Message sent from background workers to the UI event loop.
#[derive(Debug)]
pub enum WorkerMessage {
    CodeRecordLoaded {
        result: Result<CodeRecord, String>,
    },
    /// Ok carries the acknowledgement time in unix milliseconds.
    CodeRecordSaved {
        result: Result<i64, String>,
    },
    ReviewCompleted {
        result: Result<ReviewOutcome, String>,
    },
}

/// Spawns the initial fetch of the user's saved code record.
pub fn spawn_load_code_record(
    tx: UnboundedSender<WorkerMessage>,
    client: StoreClient,
    user_id: String,
) {
    tokio::spawn(async move {
        let result = fetch_code_record(&client, &user_id)
            .await
            .map_err(|error| error.to_string());

        let _ = tx.send(WorkerMessage::CodeRecordLoaded { result });
    });
}

/// Spawns one debounced upsert of the full buffer text.
pub fn spawn_save_code_record(
    tx: UnboundedSender<WorkerMessage>,
    client: StoreClient,
    user_id: String,
    code: String,
) {
    tokio::spawn(async move {
        let result = upsert_code_record(&client, &user_id, &code)
            .await
            .map(|_| unix_ms_now())
            .map_err(|error| error.to_string());

        let _ = tx.send(WorkerMessage::CodeRecordSaved { result });
    });
}

/// Spawns a review request for a buffer snapshot.
pub fn spawn_request_review(
    tx: UnboundedSender<WorkerMessage>,
    reviewer: ReviewClient,
    code: String,
) {
    tokio::spawn(async move {
        let result = reviewer
            .analyze(&code)
            .await
            .map_err(|error| error.to_string());

        let _ = tx.send(WorkerMessage::ReviewCompleted { result });
    });
}

pub(crate) fn unix_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| i64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}

use axum::Json;
use helpdesk_core::faq::FAQ_ENTRIES;
use serde::Serialize;

use crate::RouteMeta;

pub const META: RouteMeta = RouteMeta {
    method: "GET",
    path: "/faq",
    desc: "List the FAQ topics and their example questions.",
};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FaqTopic {
    pub topic: &'static str,
    pub question: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub topics: Vec<FaqTopic>,
}

pub async fn faq() -> Json<FaqResponse> {
    Json(FaqResponse { topics: topics() })
}

/// Table order, which is also match precedence.
fn topics() -> Vec<FaqTopic> {
    FAQ_ENTRIES
        .iter()
        .map(|entry| FaqTopic {
            topic: entry.topic,
            question: entry.question,
        })
        .collect()
}

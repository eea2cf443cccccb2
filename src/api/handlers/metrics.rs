// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use axum::http::header;
use axum::response::IntoResponse;

/// Prometheus text exposition of the process registry.
pub async fn get_metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather(),
    )
}

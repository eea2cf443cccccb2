// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

pub mod health;
pub mod media;
pub mod metrics;
pub mod tweets;
pub mod users;

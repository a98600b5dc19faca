// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod audit;
pub mod balances;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod splits;
pub mod utils;

pub use balances::calculate_balances;
pub use error::ValidationError;
pub use splits::{SplitStrategy, build_splits};

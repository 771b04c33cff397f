// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Concrete [`Predictor`](crate::Predictor) backends.

mod command;
mod lookup;

pub use command::CommandPredictor;
pub use lookup::LookupPredictor;

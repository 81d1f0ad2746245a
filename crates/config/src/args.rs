// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Args as ClapArgs;

/// Arguments shared by every command.
#[derive(ClapArgs, Debug, Clone)]
pub struct Args {
    /// Path to .env file (e.g., .env.polkadot)
    #[arg(short, long, global = true, default_value = ".env")]
    pub env_file: String,
}

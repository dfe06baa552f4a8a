//! Hash-password command

use clap::Args;

use crate::domain::user::validate_password;
use crate::infrastructure::user::{Argon2Hasher, PasswordHasher};

#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Plaintext password to hash
    pub password: String,
}

/// Print the PHC string for `args.password` on stdout
pub fn run(args: HashPasswordArgs) -> anyhow::Result<()> {
    validate_password(&args.password)?;

    let hash = Argon2Hasher::new().hash(&args.password)?;
    println!("{}", hash);

    Ok(())
}

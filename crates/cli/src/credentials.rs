//! Account credentials for one signup run.
//!
//! Only the email varies between runs; username and password are fixed so a
//! failed run can be reproduced by hand.

use rand::Rng;
use serde::Serialize;

use crate::config::SignupConfig;

/// Inclusive range of the numeric email suffix.
pub const EMAIL_SUFFIX_MIN: u32 = 1000;
pub const EMAIL_SUFFIX_MAX: u32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
	pub username: String,
	pub email: String,
	#[serde(skip)]
	pub password: String,
}

impl Credentials {
	pub fn generate(config: &SignupConfig, rng: &mut impl Rng) -> Self {
		Self {
			username: config.username.clone(),
			email: random_email(&config.email_domain, rng),
			password: config.password.clone(),
		}
	}
}

/// `user` + a four-digit number + `@domain`.
///
/// No uniqueness guard: two runs can collide on the same address.
pub fn random_email(domain: &str, rng: &mut impl Rng) -> String {
	let n = rng.random_range(EMAIL_SUFFIX_MIN..=EMAIL_SUFFIX_MAX);
	format!("user{n}@{domain}")
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn suffix(email: &str) -> u32 {
		let local = email.strip_prefix("user").and_then(|s| s.strip_suffix("@test.com")).unwrap();
		assert_eq!(local.len(), 4, "{email}");
		local.parse().unwrap()
	}

	#[test]
	fn email_matches_pattern() {
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..500 {
			let n = suffix(&random_email("test.com", &mut rng));
			assert!((EMAIL_SUFFIX_MIN..=EMAIL_SUFFIX_MAX).contains(&n));
		}
	}

	#[test]
	fn same_seed_same_email() {
		let a = random_email("test.com", &mut StdRng::seed_from_u64(42));
		let b = random_email("test.com", &mut StdRng::seed_from_u64(42));
		assert_eq!(a, b);
	}

	#[test]
	fn username_and_password_are_fixed() {
		let config = SignupConfig::default();
		let a = Credentials::generate(&config, &mut StdRng::seed_from_u64(1));
		let b = Credentials::generate(&config, &mut StdRng::seed_from_u64(2));
		assert_eq!(a.username, "TestUser123");
		assert_eq!(a.password, "password123");
		assert_eq!(a.username, b.username);
		assert_eq!(a.password, b.password);
	}

	#[test]
	fn password_not_serialized() {
		let creds = Credentials::generate(&SignupConfig::default(), &mut StdRng::seed_from_u64(3));
		let json = serde_json::to_value(&creds).unwrap();
		assert!(json.get("password").is_none());
		assert_eq!(json["username"], "TestUser123");
	}
}

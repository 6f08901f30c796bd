//! Fallback locator chains.
//!
//! A flaky UI control is described by an ordered list of tiers. Resolution
//! tries each tier in turn and reports which one matched, or every miss when
//! none did, so "found by description", "found by text fallback" and "not
//! found at all" stay distinguishable in logs and in the run report.

use std::time::Duration;

use droid::{By, Driver, Element};
use tracing::{debug, info};

/// How a tier looks for its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierMode {
	/// Poll until present or the wait budget runs out.
	Await,
	/// Single lookup, no waiting.
	Immediate,
	/// Last of all current matches, no waiting.
	LastOf,
}

#[derive(Debug, Clone)]
pub struct Tier {
	pub label: &'static str,
	pub by: By,
	pub mode: TierMode,
}

/// Timing for [`TierMode::Await`] tiers.
#[derive(Debug, Clone, Copy)]
pub struct WaitBudget {
	pub timeout: Duration,
	pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
	pub label: &'static str,
	pub error: String,
}

/// Every tier of a chain missed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{target} not found ({})", summarize(.attempts))]
pub struct LocateMiss {
	pub target: String,
	pub attempts: Vec<Attempt>,
}

fn summarize(attempts: &[Attempt]) -> String {
	attempts
		.iter()
		.map(|a| format!("{}: {}", a.label, a.error))
		.collect::<Vec<_>>()
		.join("; ")
}

#[derive(Debug, Clone)]
pub struct LocateChain {
	target: String,
	tiers: Vec<Tier>,
}

impl LocateChain {
	/// Starts an empty chain for the control named `target` (used in logs).
	pub fn new(target: impl Into<String>) -> Self {
		Self {
			target: target.into(),
			tiers: Vec::new(),
		}
	}

	pub fn then(mut self, label: &'static str, by: By, mode: TierMode) -> Self {
		self.tiers.push(Tier { label, by, mode });
		self
	}

	pub fn tiers(&self) -> &[Tier] {
		&self.tiers
	}

	/// Tries each tier in order and runs `action` on the first element found.
	/// Returns the label of the tier that went through.
	///
	/// A tier counts as a miss when the lookup fails or when `action` fails
	/// on what it found; either way the next tier gets its turn.
	pub async fn resolve_and<F>(&self, driver: &Driver, budget: WaitBudget, action: F) -> Result<&'static str, LocateMiss>
	where
		F: AsyncFn(&Element) -> droid::Result<()>,
	{
		let mut attempts = Vec::with_capacity(self.tiers.len());

		for (index, tier) in self.tiers.iter().enumerate() {
			debug!(target = "droid", control = %self.target, tier = tier.label, locator = %tier.by, "trying tier");

			let outcome = match find(driver, tier, budget).await {
				Ok(element) => match action(&element).await {
					Ok(()) => Ok(()),
					Err(e) => Err(format!("found but action failed: {e}")),
				},
				Err(error) => Err(error),
			};

			match outcome {
				Ok(()) => {
					info!(target = "droid", control = %self.target, tier = tier.label, fallback = index > 0, "located");
					return Ok(tier.label);
				}
				Err(error) => {
					debug!(target = "droid", control = %self.target, tier = tier.label, %error, "tier missed");
					attempts.push(Attempt {
						label: tier.label,
						error,
					});
				}
			}
		}

		Err(LocateMiss {
			target: self.target.clone(),
			attempts,
		})
	}
}

async fn find(driver: &Driver, tier: &Tier, budget: WaitBudget) -> Result<Element, String> {
	match tier.mode {
		TierMode::Await => driver
			.wait(budget.timeout)
			.poll_interval(budget.poll_interval)
			.presence_of(&tier.by)
			.await
			.map_err(|e| e.to_string()),
		TierMode::Immediate => driver.find_element(&tier.by).await.map_err(|e| e.to_string()),
		TierMode::LastOf => {
			let mut all = driver.find_elements(&tier.by).await.map_err(|e| e.to_string())?;
			all.pop().ok_or_else(|| format!("no elements matched {}", tier.by))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chain_keeps_tier_order() {
		let chain = LocateChain::new("Create Account")
			.then("description", By::description_contains("Create Account"), TierMode::Await)
			.then("text", By::text_contains("Create Account"), TierMode::Immediate);

		let labels: Vec<_> = chain.tiers().iter().map(|t| t.label).collect();
		assert_eq!(labels, ["description", "text"]);
		assert_eq!(chain.tiers()[1].mode, TierMode::Immediate);
	}

	#[test]
	fn miss_lists_every_attempt() {
		let miss = LocateMiss {
			target: "Sign Up".into(),
			attempts: vec![
				Attempt {
					label: "description",
					error: "Timeout: gone".into(),
				},
				Attempt {
					label: "last button",
					error: "no elements matched".into(),
				},
			],
		};
		assert_eq!(
			miss.to_string(),
			"Sign Up not found (description: Timeout: gone; last button: no elements matched)"
		);
	}
}

//! Git command plan for materializing an entry.
//!
//! `latest` only needs the tip of the default branch, so it gets a depth-1
//! clone and no checkout. Any other version may name an arbitrary tag, branch
//! or commit, which needs full history followed by exactly one checkout.

use crate::core::spec::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitStep {
    /// `git clone [--depth=1] <source> <destination>`
    Clone { shallow: bool },
    /// `git -C <destination> checkout <revision>`
    Checkout { revision: String },
}

pub fn plan(entry: &Entry) -> Vec<GitStep> {
    if entry.is_latest() {
        return vec![GitStep::Clone { shallow: true }];
    }
    vec![
        GitStep::Clone { shallow: false },
        GitStep::Checkout {
            revision: entry.version.clone(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::git_entry;

    fn checkouts(steps: &[GitStep]) -> usize {
        steps
            .iter()
            .filter(|step| matches!(step, GitStep::Checkout { .. }))
            .count()
    }

    #[test]
    fn latest_is_shallow_without_checkout() {
        let steps = plan(&git_entry("https://x", "latest", "deps/x"));
        assert_eq!(steps, vec![GitStep::Clone { shallow: true }]);
        assert_eq!(checkouts(&steps), 0);
    }

    #[test]
    fn pinned_version_clones_fully_then_checks_out_once() {
        for version in ["v0.2.0", "main", "2e6657f5ac013296167c4dd92fbb46f0e3dbdc5f"] {
            let steps = plan(&git_entry("https://x", version, "deps/x"));
            assert_eq!(steps[0], GitStep::Clone { shallow: false });
            assert_eq!(checkouts(&steps), 1);
            assert_eq!(
                steps[1],
                GitStep::Checkout {
                    revision: version.to_string()
                }
            );
        }
    }
}

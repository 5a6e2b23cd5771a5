use serde_json::Value;

use super::scoring::load_policy;

/// Print the policy `--policy` resolves to. A file is validated on load,
/// so this doubles as a policy-file check.
pub fn run_policy(policy_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let policy = load_policy(policy_path)?;
    Ok(serde_json::to_value(policy)?)
}

pub mod args;
pub mod hook;

use crate::analyzer::ProcessAnalyzer;
use crate::hook::HookAdapter;
use crate::platform::CurrentPlatform;

/// The adapter wired to the real host platform and process spawning.
fn adapter() -> HookAdapter<CurrentPlatform, ProcessAnalyzer> {
    HookAdapter::new(CurrentPlatform, ProcessAnalyzer)
}

//! Depth-first walk of a window's widget tree.

use crate::host::{HostRuntime, ObjectId};

/// Visit every web view below `root`, pre-order, in the host's child order.
///
/// Containers are descended into whether or not they matched as a web view.
/// Returns the number of web views visited, including ones that were
/// already registered or did not fit in the registry.
pub fn walk(
    host: &dyn HostRuntime,
    root: ObjectId,
    visit: &mut dyn FnMut(ObjectId),
) -> usize {
    let mut found = 0;
    for child in host.children(root) {
        if host.is_web_view(child) {
            visit(child);
            found += 1;
        }
        if host.is_container(child) {
            found += walk(host, child, visit);
        }
    }
    found
}

//! Operations the webview is allowed to call, and the proxy object that exposes them

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeEntry {
    /// Operation name routed by the dispatcher
    pub channel: &'static str,
    /// Method name on the webview-side namespace object
    pub method: &'static str,
    pub params: &'static [&'static str],
}

const fn entry(
    channel: &'static str,
    method: &'static str,
    params: &'static [&'static str],
) -> BridgeEntry {
    BridgeEntry {
        channel,
        method,
        params,
    }
}

pub const BRIDGE_SURFACE: &[BridgeEntry] = &[
    entry("get-config", "getConfig", &[]),
    entry("get-projects", "getProjects", &[]),
    entry("add-project", "addProject", &["project"]),
    entry("update-project", "updateProject", &["id", "updates"]),
    entry("delete-project", "deleteProject", &["id"]),
    entry("select-folder", "selectFolder", &[]),
    // Served by the process-management collaborator
    entry("start-server", "startServer", &["projectId"]),
    entry("stop-server", "stopServer", &["projectId"]),
    entry("get-running-servers", "getRunningServers", &[]),
    entry("get-server-logs", "getServerLogs", &["projectId"]),
    entry("add-quick-access-site", "addQuickAccessSite", &["site"]),
    entry("update-quick-access-site", "updateQuickAccessSite", &["id", "updates"]),
    entry("delete-quick-access-site", "deleteQuickAccessSite", &["id"]),
    entry("open-url", "openUrl", &["url"]),
];

pub fn find(channel: &str) -> Option<&'static BridgeEntry> {
    BRIDGE_SURFACE.iter().find(|e| e.channel == channel)
}

/// Webview initialization script defining `window.<namespace>`.
///
/// Each method forwards its name and positional arguments to the host `command`.
pub fn proxy_script(namespace: &str, command: &str) -> String {
    let mut script = String::new();
    script.push_str("(() => {\n");
    script.push_str("  const invoke = (name, args) =>\n");
    let _ = writeln!(
        script,
        "    window.__TAURI_INTERNALS__.invoke('{command}', {{ name, args }});"
    );
    script.push_str("  const api = {\n");
    for entry in BRIDGE_SURFACE {
        let params = entry.params.join(", ");
        let _ = writeln!(
            script,
            "    {}: ({params}) => invoke('{}', [{params}]),",
            entry.method, entry.channel
        );
    }
    script.push_str("  };\n");
    let _ = writeln!(
        script,
        "  Object.defineProperty(window, '{namespace}', {{ value: Object.freeze(api) }});"
    );
    script.push_str("})();\n");
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let channels: HashSet<_> = BRIDGE_SURFACE.iter().map(|e| e.channel).collect();
        let methods: HashSet<_> = BRIDGE_SURFACE.iter().map(|e| e.method).collect();
        assert_eq!(channels.len(), BRIDGE_SURFACE.len());
        assert_eq!(methods.len(), BRIDGE_SURFACE.len());
    }

    #[test]
    fn test_proxy_script_forwards_every_entry() {
        let script = proxy_script("shortcutAPI", "dispatch");

        assert!(script.contains("invoke('dispatch', { name, args })"));
        assert!(script.contains("Object.defineProperty(window, 'shortcutAPI'"));
        let update = "updateProject: (id, updates) => invoke('update-project', [id, updates]),";
        assert!(script.contains(update));
        assert!(script.contains("getConfig: () => invoke('get-config', []),"));
        for entry in BRIDGE_SURFACE {
            assert!(script.contains(&format!("invoke('{}'", entry.channel)));
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("open-url").map(|e| e.method), Some("openUrl"));
        assert!(find("rm-rf").is_none());
    }
}

//! Port resolution and process termination service.

use tracing::{debug, info};

use crate::adapters::{
    platform_inspector, platform_resolver, platform_terminator, KillTimings, PlatformInspector,
    PlatformResolver, PlatformTerminator,
};
use crate::domain::{Listener, Pid, ProcessInfo};
use crate::error::Result;
use crate::ports::{ListenerResolver, ProcessInspector, ProcessKillerPort};

/// Service wired with the current platform's adapters.
pub type PlatformSnipeService = SnipeService<PlatformResolver, PlatformInspector, PlatformTerminator>;

/// Application service for finding and killing the processes behind a port.
///
/// Holds no state between calls: every lookup reflects the live process
/// table at call time.
pub struct SnipeService<R, I, K> {
    resolver: R,
    inspector: I,
    killer: K,
}

impl PlatformSnipeService {
    /// Create a service for the current platform.
    pub fn platform(timings: KillTimings) -> Result<Self> {
        Ok(Self::new(
            platform_resolver()?,
            platform_inspector()?,
            platform_terminator(timings),
        ))
    }
}

impl<R, I, K> SnipeService<R, I, K>
where
    R: ListenerResolver,
    I: ProcessInspector,
    K: ProcessKillerPort,
{
    /// Create a new service from its adapters.
    pub fn new(resolver: R, inspector: I, killer: K) -> Self {
        Self {
            resolver,
            inspector,
            killer,
        }
    }

    /// Pids listening on `port`. Empty when nothing listens or lookup failed.
    pub async fn resolve_port(&self, port: u16) -> Vec<Pid> {
        match self.resolver.resolve(port).await {
            Ok(pids) => pids,
            Err(e) => {
                debug!(port = port, error = %e, "No listener found");
                Vec::new()
            }
        }
    }

    /// Metadata for `pid`, with unknown fields if it cannot be read.
    pub async fn describe_process(&self, pid: Pid) -> ProcessInfo {
        self.inspector.describe(pid).await
    }

    /// Every process listening on `port` together with its metadata.
    pub async fn listeners(&self, port: u16) -> Vec<Listener> {
        let mut listeners = Vec::new();
        for pid in self.resolve_port(port).await {
            let info = self.describe_process(pid).await;
            listeners.push(Listener { port, pid, info });
        }
        listeners
    }

    /// SIGTERM, then SIGKILL if the process outlives the grace period.
    pub async fn kill_graceful(&self, pid: Pid) -> bool {
        let killed = self.killer.kill_graceful(pid).await;
        info!(pid = pid, killed = killed, "Graceful kill finished");
        killed
    }

    /// SIGKILL right away.
    pub async fn kill_forceful(&self, pid: Pid) -> bool {
        let killed = self.killer.kill_forceful(pid).await;
        info!(pid = pid, killed = killed, "Forceful kill finished");
        killed
    }

    /// Kill with the requested escalation policy.
    pub async fn kill(&self, pid: Pid, graceful: bool) -> bool {
        if graceful {
            self.kill_graceful(pid).await
        } else {
            self.kill_forceful(pid).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Mock resolver for testing.
    struct MockResolver {
        listeners: HashMap<u16, Vec<Pid>>,
    }

    impl ListenerResolver for MockResolver {
        async fn resolve(&self, port: u16) -> Result<Vec<Pid>> {
            self.listeners
                .get(&port)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("port {}", port)))
        }
    }

    /// Mock inspector for testing.
    struct MockInspector;

    impl ProcessInspector for MockInspector {
        async fn describe(&self, pid: Pid) -> ProcessInfo {
            match pid {
                1234 => ProcessInfo::new("node /app/server.js", Some("/app/server.js".into())),
                _ => ProcessInfo::unknown(),
            }
        }
    }

    /// Mock killer that records calls; only pids in `killable` die.
    struct MockKiller {
        killable: HashSet<Pid>,
        calls: Mutex<Vec<(Pid, &'static str)>>,
    }

    impl ProcessKillerPort for MockKiller {
        async fn kill_forceful(&self, pid: Pid) -> bool {
            self.calls.lock().unwrap().push((pid, "forceful"));
            self.killable.contains(&pid)
        }

        async fn kill_graceful(&self, pid: Pid) -> bool {
            self.calls.lock().unwrap().push((pid, "graceful"));
            self.killable.contains(&pid)
        }
    }

    fn service() -> SnipeService<MockResolver, MockInspector, MockKiller> {
        SnipeService::new(
            MockResolver {
                listeners: HashMap::from([(3000, vec![1234, 5678])]),
            },
            MockInspector,
            MockKiller {
                killable: HashSet::from([1234]),
                calls: Mutex::new(Vec::new()),
            },
        )
    }

    #[tokio::test]
    async fn test_resolve_port() {
        let service = service();
        assert_eq!(service.resolve_port(3000).await, vec![1234, 5678]);
        assert!(service.resolve_port(9999).await.is_empty());
    }

    #[tokio::test]
    async fn test_listeners_pair_pids_with_metadata() {
        let listeners = service().listeners(3000).await;
        assert_eq!(listeners.len(), 2);

        assert_eq!(listeners[0].pid, 1234);
        assert_eq!(listeners[0].info.file_path_or_unknown(), "/app/server.js");

        assert_eq!(listeners[1].pid, 5678);
        assert!(listeners[1].info.is_unknown());
    }

    #[tokio::test]
    async fn test_kill_dispatches_policy() {
        let service = service();
        assert!(service.kill(1234, true).await);
        assert!(!service.kill(5678, false).await);

        let calls = service.killer.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(1234, "graceful"), (5678, "forceful")]);
    }
}

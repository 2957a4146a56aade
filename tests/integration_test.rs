// tests/integration_test.rs

//! Integration tests for pkgquery
//!
//! These tests drive `PkgQuery` through fake backends and through the real
//! backends with a scripted command runner.

use pkgquery::command::{CommandOutput, CommandRunner, render_command};
use pkgquery::{BackendKind, BackendRole, PackageBackend, PackageRecord, PkgQuery, QueryConfig, Registry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Backend with canned answers and call counters
#[derive(Default)]
struct FakeBackend {
    kind: Option<BackendKind>,
    primary: bool,
    available: bool,
    owners: HashMap<String, String>,
    installed: Vec<PackageRecord>,
    files: Vec<String>,
    owner_calls: Arc<AtomicUsize>,
    file_calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    fn new(kind: BackendKind, primary: bool) -> Self {
        Self {
            kind: Some(kind),
            primary,
            available: true,
            ..Default::default()
        }
    }

    fn owns(mut self, path: &str, package: &str) -> Self {
        self.owners.insert(path.to_string(), package.to_string());
        self
    }

    fn installed(mut self, packages: Vec<PackageRecord>) -> Self {
        self.installed = packages;
        self
    }

    fn files(mut self, files: &[&str]) -> Self {
        self.files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    fn boxed(self) -> Box<dyn PackageBackend> {
        Box::new(self)
    }
}

impl PackageBackend for FakeBackend {
    fn kind(&self) -> BackendKind {
        self.kind.unwrap_or(BackendKind::Dpkg)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn is_primary(&self) -> bool {
        self.primary
    }

    fn owning_package(&self, path: &str) -> String {
        self.owner_calls.fetch_add(1, Ordering::SeqCst);
        self.owners.get(path).cloned().unwrap_or_default()
    }

    fn installed_packages(&self) -> Vec<PackageRecord> {
        self.installed.clone()
    }

    fn file_list(&self, _pkg: &PackageRecord) -> Vec<String> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        self.files.clone()
    }
}

fn query_over(backends: Vec<Box<dyn PackageBackend>>) -> PkgQuery {
    PkgQuery::from_registry(Registry::classify(backends), &QueryConfig::default()).unwrap()
}

#[test]
fn test_ownership_is_idempotent_and_cached() {
    let backend = FakeBackend::new(BackendKind::Dpkg, true).owns("/bin/ls", "coreutils");
    let calls = backend.owner_calls.clone();
    let query = query_over(vec![backend.boxed()]);

    let first = query.ownership_of("/bin/ls");
    let second = query.ownership_of("/bin/ls");

    assert_eq!(first, "coreutils");
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "second lookup must come from the cache");
}

#[test]
fn test_primary_answer_takes_precedence() {
    // Secondary listed first in probe order, primary still asked first
    let secondary = FakeBackend::new(BackendKind::Dpkg, false).owns("/usr/bin/rpm", "rpm-from-dpkg");
    let primary = FakeBackend::new(BackendKind::Rpm, true).owns("/usr/bin/rpm", "rpm");
    let secondary_calls = secondary.owner_calls.clone();

    let query = query_over(vec![secondary.boxed(), primary.boxed()]);

    assert_eq!(query.ownership_of("/usr/bin/rpm"), "rpm");
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    assert_eq!(query.backends()[0].role, BackendRole::Primary);
}

#[test]
fn test_ownership_falls_through_to_secondary() {
    let primary = FakeBackend::new(BackendKind::Dpkg, true);
    let secondary = FakeBackend::new(BackendKind::Rpm, false).owns("/opt/app/bin/app", "app");
    let query = query_over(vec![primary.boxed(), secondary.boxed()]);

    assert_eq!(query.ownership_of("/opt/app/bin/app"), "app");
    assert_eq!(query.ownership_of("/nowhere"), "");
}

#[test]
fn test_installed_packages_is_a_union() {
    let x = PackageRecord::new("x", "1.0", "amd64");
    let y = PackageRecord::new("y", "2.0", "x86_64");
    let query = query_over(vec![
        FakeBackend::new(BackendKind::Dpkg, true).installed(vec![x.clone()]).boxed(),
        FakeBackend::new(BackendKind::Rpm, false).installed(vec![y.clone()]).boxed(),
    ]);

    assert_eq!(query.installed_packages(), vec![x, y]);
}

#[test]
fn test_installed_packages_keeps_duplicates() {
    let shared = PackageRecord::new("zlib", "1.3", "x86_64");
    let query = query_over(vec![
        FakeBackend::new(BackendKind::Dpkg, true).installed(vec![shared.clone()]).boxed(),
        FakeBackend::new(BackendKind::Rpm, false).installed(vec![shared.clone()]).boxed(),
    ]);

    assert_eq!(query.installed_packages().len(), 2);
}

#[test]
fn test_file_list_short_circuits() {
    let first = FakeBackend::new(BackendKind::Dpkg, true);
    let second = FakeBackend::new(BackendKind::Rpm, false);
    let third = FakeBackend::new(BackendKind::Pacman, false).files(&["a", "b"]);
    let fourth = FakeBackend::new(BackendKind::Pacman, false).files(&["c"]);
    let fourth_calls = fourth.file_calls.clone();

    let query = query_over(vec![first.boxed(), second.boxed(), third.boxed(), fourth.boxed()]);

    let files = query.file_list_of(&PackageRecord::new("pkg", "1", "amd64"));
    assert_eq!(files, vec!["a", "b"]);
    assert_eq!(fourth_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_no_manager_degrades_to_empty() {
    // No package manager binary exists on this host
    let runner = Arc::new(RecordingRunner::default());
    let query = PkgQuery::from_registry(Registry::detect_with(runner.clone()), &QueryConfig::default()).unwrap();
    let probes = runner.calls().len();

    assert!(!query.has_supported_manager());
    assert_eq!(query.ownership_of("/bin/ls"), "");
    assert!(query.installed_packages().is_empty());
    assert!(query.file_list_of(&PackageRecord::new("bash", "5", "amd64")).is_empty());
    assert_eq!(runner.calls().len(), probes, "queries must not run any command");
}

#[test]
fn test_unavailable_backends_are_excluded() {
    let mut missing = FakeBackend::new(BackendKind::Pacman, false);
    missing.available = false;
    let query = query_over(vec![missing.boxed()]);

    assert!(!query.has_supported_manager());
}

/// Runner answering from a script, recording every command line
#[derive(Default)]
struct RecordingRunner {
    responses: HashMap<String, CommandOutput>,
    executables: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    fn respond(mut self, line: &str, output: &str, exit_code: i32) -> Self {
        self.responses.insert(line.to_string(), CommandOutput::new(output, exit_code));
        self
    }

    fn executable(mut self, path: &str) -> Self {
        self.executables.push(path.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> pkgquery::Result<CommandOutput> {
        let line = render_command(program, args);
        self.calls.lock().unwrap().push(line.clone());
        Ok(self
            .responses
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::new(format!("{}: not scripted\n", line), 127)))
    }

    fn command_exists(&self, path: &str) -> bool {
        self.executables.iter().any(|e| e == path)
    }
}

#[test]
fn test_detects_arch_host() {
    let runner = Arc::new(
        RecordingRunner::default()
            .executable("/usr/bin/pacman")
            .respond(
                "/usr/bin/pacman -Qo /usr/bin/pacman",
                "/usr/bin/pacman is owned by pacman 5.1.1-3\n",
                0,
            )
            .respond(
                "/usr/bin/pacman -Qo /etc/pacman.conf",
                "/etc/pacman.conf is owned by pacman 5.1.1-3\n",
                0,
            ),
    );

    let query = PkgQuery::from_registry(Registry::detect_with(runner.clone()), &QueryConfig::default()).unwrap();

    assert!(query.has_supported_manager());
    assert_eq!(query.backends().len(), 1);
    assert_eq!(query.backends()[0].backend.kind(), BackendKind::Pacman);
    assert_eq!(query.ownership_of("/etc/pacman.conf"), "pacman");
}

#[test]
fn test_detects_debian_host_and_queries_through_dpkg() {
    let runner = Arc::new(
        RecordingRunner::default()
            .executable("/usr/bin/dpkg")
            .executable("/usr/bin/rpm")
            .respond("/usr/bin/dpkg -S /usr/bin/dpkg", "dpkg: /usr/bin/dpkg\n", 0)
            .respond(
                "/usr/bin/rpm -qf /usr/bin/rpm",
                "file /usr/bin/rpm is not owned by any package\n",
                1,
            )
            .respond("/usr/bin/dpkg -S /bin/ls", "coreutils: /bin/ls\n", 0)
            .respond(
                "/usr/bin/dpkg-query --show --showformat=${Package} ${Architecture} ${Version}\n",
                "pkgA amd64 1.0\nGARBAGE\npkgB amd64 2.0\n",
                0,
            )
            .respond(
                "/usr/bin/rpm -qa --queryformat %{NAME} | %{VERSION}-%{RELEASE} | %{ARCH}\n",
                "",
                0,
            ),
    );

    let query = PkgQuery::from_registry(Registry::detect_with(runner.clone()), &QueryConfig::default()).unwrap();

    let kinds: Vec<BackendKind> = query.backends().iter().map(|e| e.backend.kind()).collect();
    assert_eq!(kinds, vec![BackendKind::Dpkg, BackendKind::Rpm]);

    assert_eq!(query.ownership_of("/bin/ls"), "coreutils");
    let before = runner.calls().len();
    assert_eq!(query.ownership_of("/bin/ls"), "coreutils");
    assert_eq!(runner.calls().len(), before, "cached lookup must not run a command");

    let packages = query.installed_packages();
    assert_eq!(
        packages,
        vec![
            PackageRecord::new("pkgA", "1.0", "amd64"),
            PackageRecord::new("pkgB", "2.0", "amd64"),
        ]
    );
    assert_eq!(packages[1].version, "2.0");
}

#[test]
fn test_unowned_path_is_asked_of_every_backend_once() {
    let runner = Arc::new(
        RecordingRunner::default()
            .executable("/usr/bin/dpkg")
            .executable("/usr/bin/rpm")
            .respond("/usr/bin/dpkg -S /usr/bin/dpkg", "dpkg: /usr/bin/dpkg\n", 0)
            .respond(
                "/usr/bin/dpkg -S /home/user/file",
                "dpkg-query: no path found matching pattern /home/user/file\n",
                1,
            )
            .respond(
                "/usr/bin/rpm -qf --queryformat %{NAME} /home/user/file",
                "file /home/user/file is not owned by any package\n",
                1,
            ),
    );

    let query = PkgQuery::from_registry(Registry::detect_with(runner.clone()), &QueryConfig::default()).unwrap();
    let before = runner.calls().len();

    assert_eq!(query.ownership_of("/home/user/file"), "");
    assert_eq!(query.ownership_of("/home/user/file"), "");
    assert_eq!(runner.calls().len() - before, 2);
}

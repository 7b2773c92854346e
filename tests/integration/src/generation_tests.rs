#![cfg(unix)]

//! Multi-generation scenarios
//!
//! Walks a system through successive generations, feeding each activated
//! manifest back in as the next run's previous generation.

use genlink_core::{ActivationStatus, Capabilities, Manifest, ManifestEntry, ProblemReason, RunMode, activate_files};
use genlink_test_utils::TestSystem;

/// Activation harness remembering the last activated manifest.
struct Machine {
    system: TestSystem,
    current: Manifest,
    capabilities: Capabilities,
    generation: usize,
}

impl Machine {
    fn new(capabilities: Capabilities) -> Self {
        Self {
            system: TestSystem::new(),
            current: Manifest::new(),
            capabilities,
            generation: 0,
        }
    }

    /// Activate `next`; on success it becomes the current generation.
    fn switch(&mut self, next: Manifest) -> genlink_core::ActivationReport {
        self.generation += 1;
        let old = self
            .system
            .write_manifest(&format!("gen-{}-old.json", self.generation), &self.current);
        let new = self
            .system
            .write_manifest(&format!("gen-{}.json", self.generation), &next);

        let report = activate_files(&old, &new, RunMode::apply(), self.capabilities).unwrap();
        if report.is_success() {
            self.current = next;
        }
        report
    }
}

mod link_generations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn three_generations_converge() {
        let mut machine = Machine::new(Capabilities::default());
        let s = &machine.system;
        let v1 = s.store("v1/profile", "v1");
        let v2 = s.store("v2/profile", "v2");
        let v3 = s.store("v3/profile", "v3");
        let motd = s.store("v1/motd", "hello");
        let profile = s.path("etc/profile");
        let motd_path = s.path("etc/motd");

        machine.switch(
            Manifest::new()
                .with_entry(&profile, ManifestEntry::link(&v1))
                .with_entry(&motd_path, ManifestEntry::link(&motd)),
        );
        machine.switch(Manifest::new().with_entry(&profile, ManifestEntry::link(&v2)));
        let report = machine.switch(Manifest::new().with_entry(&profile, ManifestEntry::link(&v3)));

        assert_eq!(report.status, ActivationStatus::Applied);
        machine.system.assert_symlink("etc/profile", &v3);
        machine.system.assert_missing("etc/motd");
    }

    #[test]
    fn rollback_to_previous_generation() {
        let mut machine = Machine::new(Capabilities::default());
        let v1 = machine.system.store("v1/profile", "v1");
        let v2 = machine.system.store("v2/profile", "v2");
        let profile = machine.system.path("etc/profile");
        let gen1 = Manifest::new().with_entry(&profile, ManifestEntry::link(&v1));

        machine.switch(gen1.clone());
        machine.switch(Manifest::new().with_entry(&profile, ManifestEntry::link(&v2)));
        let report = machine.switch(gen1);

        assert!(report.is_success());
        machine.system.assert_symlink("etc/profile", &v1);
    }

    #[test]
    fn user_retargeted_link_blocks_next_generation() {
        let mut machine = Machine::new(Capabilities::default());
        let v1 = machine.system.store("v1/profile", "v1");
        let v2 = machine.system.store("v2/profile", "v2");
        let profile = machine.system.path("etc/profile");

        machine.switch(Manifest::new().with_entry(&profile, ManifestEntry::link(&v1)));
        std::fs::remove_file(&profile).unwrap();
        std::os::unix::fs::symlink("/home/user/profile", &profile).unwrap();

        let report = machine.switch(Manifest::new().with_entry(&profile, ManifestEntry::link(&v2)));

        assert_eq!(report.status, ActivationStatus::Conflicted);
        assert_eq!(report.problems[0].reason, ProblemReason::RetargetedSymlink);
        machine.system.assert_symlink("etc/profile", "/home/user/profile");
    }
}

mod copy_generations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tracked_copy_is_replaced_by_next_generation() {
        let mut machine = Machine::new(Capabilities::default());
        let v1 = machine.system.store("v1/conf", "v1");
        let v2 = machine.system.store("v2/conf", "v2");
        let conf = machine.system.path("etc/conf");

        machine.switch(
            Manifest::new().with_entry(&conf, ManifestEntry::copy(&v1).with_hash(TestSystem::sha256("v1"))),
        );
        let report = machine.switch(
            Manifest::new().with_entry(&conf, ManifestEntry::copy(&v2).with_hash(TestSystem::sha256("v2"))),
        );

        assert_eq!(report.status, ActivationStatus::Applied);
        machine.system.assert_file("etc/conf", "v2");
    }

    #[test]
    fn edited_copy_blocks_next_generation() {
        let mut machine = Machine::new(Capabilities::default());
        let v1 = machine.system.store("v1/conf", "v1");
        let v2 = machine.system.store("v2/conf", "v2");
        let conf = machine.system.path("etc/conf");

        machine.switch(
            Manifest::new().with_entry(&conf, ManifestEntry::copy(&v1).with_hash(TestSystem::sha256("v1"))),
        );
        std::fs::write(&conf, "edited").unwrap();
        let report = machine.switch(Manifest::new().with_entry(&conf, ManifestEntry::copy(&v2)));

        assert_eq!(report.problems[0].reason, ProblemReason::ModifiedFile);
        machine.system.assert_file("etc/conf", "edited");
    }

    #[test]
    fn copy_becomes_link() {
        let mut machine = Machine::new(Capabilities::default());
        let v1 = machine.system.store("v1/conf", "v1");
        let v2 = machine.system.store("v2/conf", "v2");
        let conf = machine.system.path("etc/conf");

        machine.switch(
            Manifest::new().with_entry(&conf, ManifestEntry::copy(&v1).with_hash(TestSystem::sha256("v1"))),
        );
        let report = machine.switch(Manifest::new().with_entry(&conf, ManifestEntry::link(&v2)));

        assert!(report.is_success());
        machine.system.assert_symlink("etc/conf", &v2);
    }
}

mod type_switches {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn link_becomes_copy_of_same_source_then_moves_on() {
        let mut machine = Machine::new(Capabilities::default());
        let v1 = machine.system.store("v1/conf", "v1");
        let v2 = machine.system.store("v2/conf", "v2");
        let conf = machine.system.path("etc/conf");

        machine.switch(Manifest::new().with_entry(&conf, ManifestEntry::link(&v1)));
        let report = machine.switch(
            Manifest::new().with_entry(&conf, ManifestEntry::copy(&v1).with_hash(TestSystem::sha256("v1"))),
        );
        assert_eq!(report.status, ActivationStatus::Applied);
        machine.system.assert_file("etc/conf", "v1");

        let report = machine.switch(Manifest::new().with_entry(&conf, ManifestEntry::copy(&v2)));
        assert_eq!(report.status, ActivationStatus::Applied);
        machine.system.assert_file("etc/conf", "v2");
    }
}

mod link_only {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn links_switch_and_copies_are_never_placed() {
        let mut machine = Machine::new(Capabilities::link_only());
        let v1 = machine.system.store("v1/profile", "v1");
        let v2 = machine.system.store("v2/profile", "v2");
        let conf = machine.system.store("v1/conf", "conf");
        let profile = machine.system.path("etc/profile");
        let conf_path = machine.system.path("etc/conf");

        machine.switch(
            Manifest::new()
                .with_entry(&profile, ManifestEntry::link(&v1))
                .with_entry(&conf_path, ManifestEntry::copy(&conf)),
        );
        let report = machine.switch(Manifest::new().with_entry(&profile, ManifestEntry::link(&v2)));

        assert!(report.is_success());
        machine.system.assert_symlink("etc/profile", &v2);
        machine.system.assert_missing("etc/conf");
    }

    #[test]
    fn regular_file_is_always_a_conflict() {
        let mut machine = Machine::new(Capabilities::link_only());
        let v1 = machine.system.store("v1/profile", "v1");
        machine.system.write("etc/profile", "v1");
        let profile = machine.system.path("etc/profile");

        let report = machine.switch(
            Manifest::new().with_entry(
                &profile,
                ManifestEntry::link(&v1).with_known_hashes([TestSystem::sha256("v1")]),
            ),
        );

        assert_eq!(report.problems[0].reason, ProblemReason::CopyUnsupported);
        machine.system.assert_file("etc/profile", "v1");
    }
}

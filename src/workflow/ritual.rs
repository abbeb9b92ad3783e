//! Built-in Release Ritual
//!
//! The default procedure for releasing a Python package: checks, clean
//! builds and tests, a push/CI cycle before and after the pre-release tag,
//! packaging, a TestPyPI round trip checked by hand, the PyPI upload, the
//! final tag and a last push that lets CI build and publish wheels.

use crate::config::RunConfig;
use crate::error::Result;
use crate::execution::step::{BumpVersion, Instruct, OpenBrowser, RunCommand};

use super::metadata::PackageMetadataResolver;
use super::model::Procedure;

const WAIT_FOR_CI: &str = "Wait for CI to complete and verify that it's successful";
const WAIT_FOR_DOCS: &str = "Wait for the documentation build to complete and verify that it's successful";
const PUSH: &str = "git push -u --tags origin master";

fn git_add() -> Instruct {
    Instruct::new()
        .say("Add everything to git and commit")
        .command("git gui")
}

/// Builds the default release procedure.
pub fn release_procedure(config: &RunConfig, resolver: &PackageMetadataResolver) -> Result<Procedure> {
    let ci = || OpenBrowser::new(&config.ci_url, WAIT_FOR_CI);

    Procedure::new()
        .with(
            "gittomaster",
            Instruct::new()
                .say("Make sure you're on master and changes are merged in")
                .command("git checkout master"),
        )?
        .with("gitadd1", git_add())?
        .with("clean1", RunCommand::new("make clean"))?
        .with("docs1", RunCommand::new("make docs"))?
        .with("runtests", RunCommand::new("make test"))?
        // CI runs the test suite on all platforms
        .with("push1", RunCommand::new(PUSH))?
        .with("travis1", ci())?
        .with("waitrtd", OpenBrowser::new(&config.docs_url, WAIT_FOR_DOCS))?
        .with("bumpversion", BumpVersion::new(resolver.clone()))?
        .with("gitadd2", git_add())?
        .with(
            "gittagpre",
            Instruct::new()
                .say("Tag version as a pre-release (increment as needed)")
                .command("git tag v{version}-rc.1"),
        )?
        // CI builds wheels for the pre-release tag
        .with("push2", RunCommand::new(PUSH))?
        .with("travis2", ci())?
        .with(
            "changelog",
            Instruct::new()
                .say("Update change log for version {version}")
                .command("vi CHANGELOG.md"),
        )?
        .with("clean2", RunCommand::new("make clean"))?
        .with("docs2", RunCommand::new("make docs"))?
        .with("dist", RunCommand::new("make dist"))?
        .with(
            "testpypi",
            RunCommand::new("twine upload --repository-url https://test.pypi.org/legacy/ dist/*"),
        )?
        .with(
            "install",
            Instruct::new()
                .command("cd /tmp/")
                .command("rm -rf ./venv")
                .command("virtualenv ./venv")
                .command("source ./venv/bin/activate")
                .command(
                    "pip install --index-url https://test.pypi.org/simple/ \
                     --extra-index-url https://pypi.org/simple {pkgname}[full]=={version}",
                ),
        )?
        .with(
            "testpkg",
            Instruct::new()
                .say("Ensure that the following command gives version {version}")
                .command("{pkgname} -V"),
        )?
        .with(
            "deactivate",
            Instruct::new()
                .command("deactivate")
                .say("Go back to the project directory"),
        )?
        .with(
            "addrelease",
            Instruct::new()
                .say("Add Changelog & Readme to git")
                .say("Commit with title: {pkgname} Release {version}")
                .say("Embed changelog in body commit message")
                .command("git gui"),
        )?
        .with("pypi", RunCommand::new("twine upload dist/*"))?
        .with("tagfinal", RunCommand::new("git tag v{version}"))?
        // CI builds wheels for the release tag and uploads them to PyPI
        .with("push3", RunCommand::new(PUSH))?
        .with("travis3", ci())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::operator::ScriptedOperator;
    use crate::workflow::context::Context;
    use crate::workflow::metadata::PackageMetadata;

    fn procedure() -> Procedure {
        let config = RunConfig::default();
        let resolver = PackageMetadataResolver::new(&config);
        release_procedure(&config, &resolver).unwrap()
    }

    #[test]
    fn test_ritual_order() {
        assert_eq!(
            procedure().names(),
            vec![
                "gittomaster", "gitadd1", "clean1", "docs1", "runtests", "push1", "travis1",
                "waitrtd", "bumpversion", "gitadd2", "gittagpre", "push2", "travis2", "changelog",
                "clean2", "docs2", "dist", "testpypi", "install", "testpkg", "deactivate",
                "addrelease", "pypi", "tagfinal", "push3", "travis3",
            ]
        );
    }

    #[test]
    fn test_ci_steps_use_configured_url() {
        let mut config = RunConfig::default();
        config.ci_url = "https://ci.example.org/demo".to_string();
        let resolver = PackageMetadataResolver::new(&config);
        let procedure = release_procedure(&config, &resolver).unwrap();

        let entry = procedure.iter().find(|e| e.name == "travis2").unwrap();
        let mut op = ScriptedOperator::new();
        let mut context = Context::default();
        entry.step.action(&mut context, &mut op).unwrap();
        assert_eq!(op.urls, vec!["https://ci.example.org/demo"]);
    }

    #[test]
    fn test_install_renders_package_and_version() {
        let procedure = procedure();
        let entry = procedure.iter().find(|e| e.name == "install").unwrap();

        let mut context = Context::from_metadata(PackageMetadata {
            pkgname: "demo".to_string(),
            version: "0.5.0".to_string(),
        });
        let mut op = ScriptedOperator::new();
        entry.step.action(&mut context, &mut op).unwrap();

        let transcript = op.transcript();
        assert!(transcript.contains("demo[full]==0.5.0"));
        assert_eq!(transcript.matches("Run:").count(), 1);
    }
}

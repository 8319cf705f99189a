/// A discrete step of the release pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CredentialStore,
    Identity,
    Coordinates,
    Version,
    StampSource,
    TagChart,
    TagSource,
    Build,
    ContainerBuild,
    PostBuild,
    Changelog,
    ChartRelease,
    Promotion,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::CredentialStore => "git credential store configured",
            Self::Identity => "git identity configured",
            Self::Coordinates => "image coordinates resolved",
            Self::Version => "next version resolved",
            Self::StampSource => "version stamped into source",
            Self::TagChart => "chart descriptors tagged",
            Self::TagSource => "release tag pushed",
            Self::Build => "source built and deployed",
            Self::ContainerBuild => "container image built",
            Self::PostBuild => "image recorded",
            Self::Changelog => "changelog generated",
            Self::ChartRelease => "chart released",
            Self::Promotion => "version promoted",
        };
        f.write_str(text)
    }
}

/// Stages completed so far in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    completed: Vec<Stage>,
}

impl Progress {
    pub fn record(&mut self, stage: Stage) {
        tracing::debug!(%stage, "stage complete");
        self.completed.push(stage);
    }

    pub fn into_stages(self) -> Vec<Stage> {
        self.completed
    }
}

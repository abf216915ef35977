/// Tuning knobs shared by stages, the materializer and ordered views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Lend the stage itself out as the cursor for its first pass in the
    /// owning context. When `false` every pass runs on a clone.
    pub reuse_cursors: bool,
    /// First allocation of the incremental materializer; doubled when full.
    pub initial_capacity: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { reuse_cursors: true, initial_capacity: 4 }
    }
}

impl PipelineOptions {
    pub fn builder() -> PipelineOptionsBuilder {
        PipelineOptionsBuilder::new()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PipelineOptionsBuilder {
    options: PipelineOptions,
}

impl PipelineOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reuse_cursors(mut self, reuse: bool) -> Self {
        self.options.reuse_cursors = reuse;
        self
    }

    /// Clamped to at least one slot.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.options.initial_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> PipelineOptions {
        self.options
    }
}

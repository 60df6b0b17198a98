use std::sync::Arc;

use crate::adapters::toml_config::ClipperConfig;
use crate::adapters::{
    AllowListAuthorizer, FFmpegAdapter, LibavProbeAdapter, LocalWorkspaceAdapter,
    WhisperCliTranscriber, ZipArchiver,
};
use crate::app::{AccessGate, ClipPipeline, InspectInteractor, PipelineSettings};
use crate::ports::{
    ArchiverPort, AuthorizationPort, MediaEnginePort, MediaProbePort, TranscriberPort,
    WorkspacePort,
};

pub trait AppContainer: Send + Sync {
    fn pipeline(&self) -> Arc<ClipPipeline>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn gate(&self) -> Arc<AccessGate>;
}

pub struct DefaultAppContainer {
    pipeline: Arc<ClipPipeline>,
    inspect_interactor: Arc<InspectInteractor>,
    gate: Arc<AccessGate>,
}

impl DefaultAppContainer {
    /// Wire the production adapters from a loaded configuration
    pub fn new(config: &ClipperConfig) -> Self {
        let probe_port = Arc::new(LibavProbeAdapter::new());
        let engine_port = Arc::new(
            FFmpegAdapter::new(config.tools.ffmpeg.clone(), config.encoding.to_settings())
                .with_font_file(config.captions.font_file.clone()),
        );
        let transcriber_port = Arc::new(
            WhisperCliTranscriber::new(
                config.captions.program.clone(),
                config.captions.model.clone(),
            )
            .with_language(config.captions.language.clone()),
        );
        let archiver_port = Arc::new(ZipArchiver::new());
        let workspace_port = Arc::new(LocalWorkspaceAdapter::new(config.workspace.root.clone()));
        let authorizer = Arc::new(AllowListAuthorizer::new(
            &config.access.allowed_identities,
        ));

        let settings = PipelineSettings {
            logo_height: config.overlay.logo_height,
            caption_font_size: config.captions.font_size,
            keep_scratch: config.workspace.keep_scratch,
            progress: config.logging.progress,
        };

        let pipeline = Arc::new(ClipPipeline::new(
            Arc::clone(&probe_port) as Arc<dyn MediaProbePort>,
            engine_port as Arc<dyn MediaEnginePort>,
            transcriber_port as Arc<dyn TranscriberPort>,
            archiver_port as Arc<dyn ArchiverPort>,
            workspace_port as Arc<dyn WorkspacePort>,
            settings,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            probe_port as Arc<dyn MediaProbePort>,
        ));

        let gate = Arc::new(AccessGate::new(authorizer as Arc<dyn AuthorizationPort>));

        Self {
            pipeline,
            inspect_interactor,
            gate,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn pipeline(&self) -> Arc<ClipPipeline> {
        Arc::clone(&self.pipeline)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn gate(&self) -> Arc<AccessGate> {
        Arc::clone(&self.gate)
    }
}

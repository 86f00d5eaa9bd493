use crate::{EnvConfig, template_engine};
use axum::response::IntoResponse;
use axum_template::{RenderHtml, engine::Engine};
use libcenote::loader::DefaultFetcher;
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};
use tracing::debug;

type TemplateEngine = Engine<minijinja::Environment<'static>>;

#[derive(Debug)]
pub struct SharedState {
    pub tmpl: TemplateEngine,
    pub config: EnvConfig,
    pub datadir: PathBuf,
    pub fetcher: DefaultFetcher,
}

impl SharedState {
    pub fn new(env: EnvConfig, datadir: PathBuf) -> Self {
        let tmpl_path = datadir.join("templates");
        debug!(?tmpl_path, "Creating shared app state");
        Self {
            tmpl: template_engine(&tmpl_path),
            config: env,
            datadir,
            fetcher: DefaultFetcher::default(),
        }
    }

    pub fn render_template<K, S>(&self, key: K, data: S) -> impl IntoResponse + use<K, S>
    where
        K: AsRef<str>,
        S: Serialize,
    {
        RenderHtml(key, self.tmpl.clone(), data)
    }

    /// Directory that the survey's relative source locations are resolved against
    pub fn survey_dir(&self) -> PathBuf {
        self.config
            .survey
            .datadir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(test)]
    pub fn test(survey: libcenote::survey::SurveyConfig) -> Self {
        debug!("Creating test shared app state");
        Self {
            tmpl: template_engine("./templates"),
            config: EnvConfig {
                listen: crate::config::ListenConfig {
                    host: "127.0.0.1".to_string(),
                    port: 8080,
                },
                survey,
                map: Default::default(),
                tiles: Default::default(),
            },
            datadir: ".".into(),
            fetcher: DefaultFetcher::default(),
        }
    }
}

pub type AppState = Arc<SharedState>;

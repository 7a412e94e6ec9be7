//! The per-input pipeline driver.
//!
//! Composes read, fatal evaluation, healing, road-space build, CityGML
//! build, and write for one input document. Reports are merged in traversal
//! order and always produced, even for fatal or cancelled runs.

use std::path::Path;

use citygml_build::build_citygml;
use citygml_types::{CityGmlWriter, CityModel};
use opendrive_eval::{
    evaluate_fatal, evaluate_non_fatal, CancellationToken, DataQualityMessage, MessageCode,
    MessageList, SourceId,
};
use opendrive_xml::{read_opendrive_str, OdrXmlError};
use roadspaces_build::{build_roadspaces_cancellable, BuildError};

use crate::config::PipelineConfig;
use crate::report::{Outcome, PipelineReport};

/// Convert one document to a city model without touching the filesystem.
///
/// Returns the city model and every non-fatal finding, or the fatal findings
/// when conversion is impossible.
///
/// # Errors
///
/// The error side carries the full message list including the fatal entries.
pub fn convert_str(
    xml: &str,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<(CityModel, MessageList), MessageList> {
    let mut messages = MessageList::new();

    if cancel.is_cancelled() {
        messages.push(cancelled_message());
        return Err(messages);
    }

    let (model, version) = match read_opendrive_str(xml) {
        Ok(parsed) => parsed,
        Err(error) => {
            messages.push(xml_error_message(&error));
            return Err(messages);
        }
    };
    tracing::debug!(%version, roads = model.roads.len(), "document read");

    let fatal = evaluate_fatal(&model);
    if fatal.has_fatal() {
        messages.merge(fatal);
        return Err(messages);
    }
    messages.merge(fatal);

    if cancel.is_cancelled() {
        messages.push(cancelled_message());
        return Err(messages);
    }

    let (healed, heal_messages) = evaluate_non_fatal(&model, &config.eval_config());
    messages.merge(heal_messages);

    if cancel.is_cancelled() {
        messages.push(cancelled_message());
        return Err(messages);
    }

    let (roadspaces, build_messages) =
        match build_roadspaces_cancellable(&healed, &config.build_config(), cancel) {
            Ok(built) => built,
            Err(error) => {
                messages.push(build_error_message(&error));
                return Err(messages);
            }
        };
    messages.merge(build_messages);

    if cancel.is_cancelled() {
        messages.push(cancelled_message());
        return Err(messages);
    }

    let (city, citygml_messages) = match build_citygml(&roadspaces, &config.citygml_config()) {
        Ok(built) => built,
        Err(error) => {
            messages.push(DataQualityMessage::fatal(
                MessageCode::NumericalFailure,
                SourceId::dataset(),
                error.to_string(),
            ));
            return Err(messages);
        }
    };
    messages.merge(citygml_messages);

    Ok((city, messages))
}

/// Run the full pipeline for one input: convert, write, report.
///
/// A report is produced for every outcome; the output file exists only for
/// [`Outcome::Completed`].
pub fn process_str(
    xml: &str,
    input_name: &str,
    target: &Path,
    writer: &dyn CityGmlWriter,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> PipelineReport {
    match convert_str(xml, config, cancel) {
        Ok((city, mut messages)) => match writer.write(&city, target) {
            Ok(output) => PipelineReport {
                input: input_name.to_string(),
                outcome: Outcome::Completed { output },
                messages,
            },
            Err(error) => {
                messages.push(DataQualityMessage::fatal(
                    MessageCode::NumericalFailure,
                    SourceId::dataset(),
                    format!("writing failed: {error}"),
                ));
                PipelineReport {
                    input: input_name.to_string(),
                    outcome: Outcome::Fatal,
                    messages,
                }
            }
        },
        Err(messages) => {
            let outcome = if messages.count_code(MessageCode::Cancelled) > 0 {
                Outcome::Cancelled
            } else {
                Outcome::Fatal
            };
            PipelineReport {
                input: input_name.to_string(),
                outcome,
                messages,
            }
        }
    }
}

fn cancelled_message() -> DataQualityMessage {
    DataQualityMessage::fatal(
        MessageCode::Cancelled,
        SourceId::dataset(),
        "run cancelled by host",
    )
}

fn xml_error_message(error: &OdrXmlError) -> DataQualityMessage {
    let code = match error {
        OdrXmlError::NoDedicatedReaderAvailable(_) => MessageCode::NoDedicatedReaderAvailable,
        OdrXmlError::NoDedicatedSchemaAvailable(_) => MessageCode::NoDedicatedSchemaAvailable,
        _ => MessageCode::MalformedXml,
    };
    DataQualityMessage::fatal(code, SourceId::dataset(), error.to_string())
}

fn build_error_message(error: &BuildError) -> DataQualityMessage {
    let code = match error {
        BuildError::UnresolvedReference { .. } => MessageCode::UnresolvedReference,
        BuildError::MissingGeometry { .. } => MessageCode::NoPlanViewGeometry,
        BuildError::Cancelled => MessageCode::Cancelled,
        BuildError::Numerical { .. } | BuildError::Model(_) => MessageCode::NumericalFailure,
    };
    DataQualityMessage::fatal(code, SourceId::dataset(), error.to_string())
}

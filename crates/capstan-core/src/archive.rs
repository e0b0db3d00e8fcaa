//! Archive codec for packaged charts
//!
//! A packaged chart is a gzip-compressed tar stream with every entry placed
//! under a single top-level directory named after the chart, e.g.
//! `mychart/Chart.yaml`, `mychart/templates/deployment.yaml`.

use std::io::{Cursor, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::{Archive, Builder, Header};

use crate::chart::{Chart, ChartFile, ChartMetadata};
use crate::error::{CoreError, Result};

/// Write a chart as a gzip-compressed tar stream
///
/// Fails before writing any byte if the chart metadata carries no name.
pub fn write_chart<W: Write>(chart: &Chart, writer: W) -> Result<()> {
    let name = chart.metadata.name.as_str();
    if name.is_empty() {
        return Err(CoreError::InvalidChart {
            message: "cannot package a chart without a name".to_string(),
        });
    }

    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = Builder::new(encoder);

    let metadata_yaml = serde_yaml::to_string(&chart.metadata)?;
    append_bytes(
        &mut builder,
        &format!("{name}/Chart.yaml"),
        metadata_yaml.as_bytes(),
    )?;

    if let Some(values) = &chart.values_yaml {
        append_bytes(&mut builder, &format!("{name}/values.yaml"), values.as_bytes())?;
    }

    for file in &chart.files {
        append_bytes(&mut builder, &format!("{}/{}", name, file.path), &file.data)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    Ok(())
}

/// Read a chart from a gzip-compressed tar stream
pub fn read_chart<R: Read>(reader: R) -> Result<Chart> {
    let decoder = GzDecoder::new(reader);
    let mut archive = Archive::new(decoder);

    let mut metadata: Option<ChartMetadata> = None;
    let mut values_yaml: Option<String> = None;
    let mut files = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.header().entry_type().is_dir() {
            continue;
        }

        let path = entry.path()?.to_string_lossy().to_string();
        // Entries live under the top-level chart directory; anything else is
        // not part of the chart tree.
        let Some((_, relative)) = path.split_once('/') else {
            continue;
        };
        if relative.is_empty() {
            continue;
        }

        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;

        match relative {
            "Chart.yaml" => {
                let text = utf8(data, "Chart.yaml")?;
                metadata = Some(serde_yaml::from_str(&text)?);
            }
            "values.yaml" => {
                values_yaml = Some(utf8(data, "values.yaml")?);
            }
            _ => files.push(ChartFile {
                path: relative.to_string(),
                data,
            }),
        }
    }

    let metadata = metadata.ok_or_else(|| CoreError::Archive {
        message: "Chart.yaml not found in archive".to_string(),
    })?;
    if metadata.name.is_empty() {
        return Err(CoreError::InvalidChart {
            message: "chart name is empty in archived Chart.yaml".to_string(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(Chart {
        metadata,
        values_yaml,
        files,
    })
}

/// Read a chart from archive bytes already held in memory
pub fn read_chart_bytes(data: &[u8]) -> Result<Chart> {
    read_chart(Cursor::new(data))
}

/// Generate the default archive filename for a chart
#[must_use]
pub fn default_archive_name(chart: &Chart) -> String {
    match &chart.metadata.version {
        Some(version) => format!("{}-{}.tgz", chart.metadata.name, version),
        None => format!("{}.tgz", chart.metadata.name),
    }
}

fn utf8(data: Vec<u8>, entry: &str) -> Result<String> {
    String::from_utf8(data).map_err(|e| CoreError::Archive {
        message: format!("invalid UTF-8 in {entry}: {e}"),
    })
}

fn append_bytes<W: Write>(builder: &mut Builder<W>, path: &str, content: &[u8]) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0); // Reproducible archives: use epoch time
    header.set_cksum();

    builder.append_data(&mut header, path, content)?;

    Ok(())
}

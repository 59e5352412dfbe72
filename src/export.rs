//! 分類結果の CSV 書き出しと読み戻し。
//!
//! 1 回の実行につき 1 ファイルを作成し、削除はしない。
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::{classification::ClassificationRecord, table::ResultTable};

pub const EXPORT_PREFIX: &str = "comments-";
pub const EXPORT_SUFFIX: &str = ".csv";

/// 書き出したファイルの場所。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub path: PathBuf,
}

/// 表をインデックス列なしの UTF-8 CSV として `dir` に書き出す。
///
/// # Errors
/// ファイルの作成・書き込み・永続化のいずれかに失敗した場合。
pub fn write_export(table: &ResultTable, dir: &Path) -> Result<ExportArtifact> {
    let temp = tempfile::Builder::new()
        .prefix(EXPORT_PREFIX)
        .suffix(EXPORT_SUFFIX)
        .tempfile_in(dir)
        .with_context(|| format!("failed to create export file in {}", dir.display()))?;
    let (file, path) = temp
        .keep()
        .context("failed to persist export file")?;

    let mut writer = csv::Writer::from_writer(file);
    if table.is_empty() {
        // serde 経由ではレコードが無いとヘッダも出ないため明示的に書く
        writer
            .write_record(["Comment", "Sentiment", "Sentiment Score", "Toxicity", "Toxicity Score"])
            .context("failed to write export header")?;
    }
    for row in table.rows() {
        writer
            .serialize(row)
            .context("failed to write export row")?;
    }
    writer.flush().context("failed to flush export file")?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("export file name is not valid UTF-8")?
        .to_string();
    debug!(path = %path.display(), rows = table.len(), "wrote export");

    Ok(ExportArtifact { file_name, path })
}

/// 書き出した CSV を読み戻す。
///
/// # Errors
/// ファイルが開けない、または行の形式が不正な場合。
pub fn read_export(path: &Path) -> Result<Vec<ClassificationRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    csv::Reader::from_reader(file)
        .deserialize()
        .collect::<Result<Vec<ClassificationRecord>, _>>()
        .context("failed to parse export file")
}

/// ダウンロード要求のファイル名がエクスポータの命名規則に従うか。
#[must_use]
pub fn is_export_file_name(name: &str) -> bool {
    name.starts_with(EXPORT_PREFIX)
        && name.ends_with(EXPORT_SUFFIX)
        && name.len() > EXPORT_PREFIX.len() + EXPORT_SUFFIX.len()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        && !name.contains("..")
}

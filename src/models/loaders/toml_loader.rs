use crate::error::{AppError, AppResult, FileError};
use crate::models::draft::{AttemptDraft, AudioClip};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// 从 TOML 文件加载答卷草稿，并读取其中引用的录音文件
///
/// 录音缺失或读取失败只影响该题（不提交评分），其余题目照常加载
pub async fn load_draft(toml_file_path: &Path) -> AppResult<AttemptDraft> {
    let path_str = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let draft: AttemptDraft = toml::from_str(&content).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: path_str.clone(),
            source: Box::new(e),
        })
    })?;

    let mut draft = draft.with_file_path(path_str);

    // 录音路径相对于草稿文件所在目录
    let base_dir = toml_file_path.parent().unwrap_or_else(|| Path::new("."));
    for answer in draft.answers.iter_mut() {
        let Some(audio_file) = answer.audio_file.as_deref() else {
            continue;
        };

        let audio_path = base_dir.join(audio_file);
        let bytes = match fs::read(&audio_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    "题目 {} 的录音无法读取，跳过该题评分: {}",
                    answer.question_id,
                    AppError::file_read_failed(audio_path.display().to_string(), e)
                );
                continue;
            }
        };

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| audio_file.to_string());
        let mime_type = AudioClip::mime_for(&file_name);

        answer.audio = Some(AudioClip::new(file_name, mime_type, bytes));
    }

    Ok(draft)
}

/// 从文件夹中加载所有答卷草稿
///
/// 单个文件加载失败只记录警告，不影响其他文件
pub async fn load_all_drafts(folder_path: &str) -> AppResult<Vec<AttemptDraft>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut drafts = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_draft(&path).await {
            Ok(draft) => {
                tracing::info!("成功加载 {} 个答案", draft.answers.len());
                drafts.push(draft);
            }
            Err(e) => {
                warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(drafts)
}

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use log::{info, warn};
use rayon::prelude::*;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::batch::{BatchInput, BatchOutput, FileOutcome, ProgressEvent};
use crate::models::conversion::{ConversionRequest, ConversionResult};
use crate::models::file::{ConversionTarget, FileCollectInput};
use crate::service::file::{batch_output_dir, display_name, is_batch_output, resolve_targets};
use crate::service::traits::i_service::{FileServiceTrait, HistoryServiceTrait, IconServiceTrait};

pub struct ConversionFacade {
    file_service: Box<dyn FileServiceTrait>,
    icon_service: Box<dyn IconServiceTrait>,
    history: Option<Box<dyn HistoryServiceTrait>>,
}

impl ConversionFacade {
    pub fn new(
        file_service: Box<dyn FileServiceTrait>,
        icon_service: Box<dyn IconServiceTrait>,
        history: Option<Box<dyn HistoryServiceTrait>>,
    ) -> Self {
        ConversionFacade {
            file_service,
            icon_service,
            history,
        }
    }

    /// 釋放歷史記錄連線
    pub fn shutdown(self) -> io::Result<()> {
        match self.history {
            Some(history) => history.close(),
            None => Ok(()),
        }
    }

    fn convert_target(
        &self,
        index: usize,
        total: usize,
        target: &ConversionTarget,
        input: &BatchInput,
        progress: &(dyn Fn(ProgressEvent) + Sync),
        cancel: &AtomicBool,
    ) -> FileOutcome {
        let file_name = display_name(&target.source_path);
        if cancel.load(Ordering::SeqCst) {
            info!("已取消，跳過：{}", file_name);
            return FileOutcome {
                source_path: target.source_path.clone(),
                output_path: target.output_path.clone(),
                result: None,
            };
        }

        progress(ProgressEvent::Started {
            index,
            total,
            file_name: file_name.clone(),
        });

        let request = ConversionRequest::new(&target.source_path, &target.output_path, input.sizes.clone())
            .preserve_aspect_ratio(input.preserve_aspect_ratio)
            .force_alpha_channel(input.force_alpha_channel);
        let result = self.icon_service.convert(&request);
        if result.success {
            self.record_history(target, &result);
        }

        progress(ProgressEvent::Finished {
            index,
            total,
            file_name,
            success: result.success,
        });

        FileOutcome {
            source_path: target.source_path.clone(),
            output_path: target.output_path.clone(),
            result: Some(result),
        }
    }

    fn record_history(&self, target: &ConversionTarget, result: &ConversionResult) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(e) = history.add_record(&target.source_path, &target.output_path, &result.sizes()) {
            warn!("無法寫入歷史記錄 {}：{}", target.source_path.display(), e);
        }
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_batch(
        &self,
        input: BatchInput,
        progress: &(dyn Fn(ProgressEvent) + Sync),
        cancel: &AtomicBool,
    ) -> io::Result<BatchOutput> {
        let file_output = self.file_service.collect_images(FileCollectInput {
            input_paths: input.input_paths.clone(),
            include_patterns: input.include.clone(),
            exclude_patterns: input.exclude.clone(),
        })?;
        let files = file_output.files;

        let is_batch = is_batch_output(files.len(), &input.output);
        let output_dir = if is_batch {
            batch_output_dir(&files, &input.output)
        } else {
            input.output.parent().map(|p| p.to_path_buf()).unwrap_or_default()
        };

        if files.is_empty() {
            warn!("無符合條件的圖片可處理");
            return Ok(BatchOutput::new(Vec::new(), output_dir, is_batch));
        }

        let targets = resolve_targets(&files, &input.output);
        let total = targets.len();
        info!(
            "開始轉換 {} 個檔案，輸出：{}，尺寸：{:?}",
            total,
            input.output.display(),
            input.sizes
        );

        let results: Vec<FileOutcome> = if input.parallel {
            targets
                .par_iter()
                .enumerate()
                .map(|(i, target)| self.convert_target(i + 1, total, target, &input, progress, cancel))
                .collect()
        } else {
            targets
                .iter()
                .enumerate()
                .map(|(i, target)| self.convert_target(i + 1, total, target, &input, progress, cancel))
                .collect()
        };

        let output = BatchOutput::new(results, output_dir, is_batch);
        info!(
            "批次轉換結束：成功 {}/{}，失敗 {}，跳過 {}",
            output.success_count,
            output.total_count,
            output.failed_count(),
            output.skipped_count
        );
        Ok(output)
    }
}

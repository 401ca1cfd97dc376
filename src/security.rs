//! Security Module
//!
//! 入力サイズの上限を実装するモジュール。
//! 巨大なアップロードや、疎なシートが巨大な稠密グリッドに展開されることを防ぎます。

use crate::error::ExtractError;

/// セキュリティ設定
///
/// ワークブック処理時の制限を定義します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 50MB (52_428_800 bytes)
    pub max_input_file_size: u64,
    /// グリッドの最大セル数（行 × 列）
    /// デフォルト: 5_000_000
    pub max_grid_cells: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 52_428_800, // 50MB
            max_grid_cells: 5_000_000,
        }
    }
}

impl SecurityConfig {
    /// 入力バイト数を検証する
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以内の場合
    /// * `Err(ExtractError::SecurityViolation)` - 上限を超えた場合
    pub fn check_input_size(&self, len: usize) -> Result<(), ExtractError> {
        if len as u64 > self.max_input_file_size {
            return Err(ExtractError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                len, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// 展開後のグリッドサイズを検証する
    pub fn check_grid_size(&self, rows: usize, cols: usize) -> Result<(), ExtractError> {
        let cells = (rows as u64).saturating_mul(cols as u64);
        if cells > self.max_grid_cells {
            return Err(ExtractError::SecurityViolation(format!(
                "Worksheet grid exceeds maximum: {} x {} cells (max: {} cells)",
                rows, cols, self.max_grid_cells
            )));
        }
        Ok(())
    }
}

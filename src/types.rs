//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::ops::Range;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// セルの値を表す列挙型
///
/// ワークブックから読み込んだセルは、この4種類のいずれかに正規化されます。
/// 論理値やエラー値は、表示文字列（`True`、`#DIV/0!`など）の`Text`として扱います。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空セル
    Empty,

    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 日時
    Date(NaiveDateTime),
}

impl CellValue {
    /// 文字列セルを生成するヘルパー
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// 値が空かどうかを判定
    ///
    /// 空白のみの文字列やNaNも空として扱います。
    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }

    /// セルの文字列表現を取得する
    ///
    /// 「空」の判定はすべてこのメソッドを通して行います。抽出処理がセルの生の値を
    /// 直接比較することはありません。
    ///
    /// # 戻り値
    ///
    /// * `None` - 空セル、NaN、または空白のみの文字列
    /// * `Some(String)` - 前後の空白を除去した文字列
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Number(n) if n.is_nan() => return None,
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// 数値を表示用文字列に変換
///
/// 整数値は小数部なし（`1000`）、それ以外は往復可能な最短の10進表現で出力します。
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// 投資ブロック（列範囲）
///
/// グリッドのコピーではなく、`[start, end)`の列範囲を表すだけの論理的な区画です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    /// 開始列（"Name of Investment"ラベルを含む列）
    pub start: usize,
    /// 終了列（排他）
    pub end: usize,
}

impl Block {
    /// 新しいブロックを生成
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// ブロックに含まれる列の範囲
    pub fn columns(&self) -> Range<usize> {
        self.start..self.end
    }

    /// ブロックの列数
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// 挿入順を保持するラベル→値のマップ
///
/// 同じラベルを再挿入した場合、位置は最初の挿入位置のまま値だけが置き換わります。
/// JSONにはオブジェクトとして、挿入順でシリアライズされます。
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for LabelMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> LabelMap<V> {
    /// 空のマップを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を挿入し、既存の値があれば返す
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 挿入順でイテレート
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V: Serialize> Serialize for LabelMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for LabelMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = LabelMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

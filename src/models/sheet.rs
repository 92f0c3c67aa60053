//! 工作表行数据模型
//!
//! 列布局（与线上表格保持一致）：
//! A=id(日期键) B=title C=year D=content_simple E=content_detailed F=related_movies

/// 列号常量（0 基）
pub const COL_ID: usize = 0;
pub const COL_TITLE: usize = 1;
pub const COL_YEAR: usize = 2;
pub const COL_SIMPLE: usize = 3;
pub const COL_DETAIL: usize = 4;
pub const COL_MOVIES: usize = 5;

/// 列字母（与列号常量一一对应）
pub const COLUMN_LETTERS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// 工作表中的一行数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    pub id: String,
    pub title: String,
    pub year: String,
    pub content_simple: String,
    pub content_detailed: String,
    pub related_movies: String,
}

impl SheetRow {
    /// 从原始单元格列表构建（缺失的单元格按空串处理）
    pub fn from_values(values: &[String]) -> Self {
        let cell = |idx: usize| values.get(idx).cloned().unwrap_or_default();
        Self {
            id: cell(COL_ID),
            title: cell(COL_TITLE),
            year: cell(COL_YEAR),
            content_simple: cell(COL_SIMPLE),
            content_detailed: cell(COL_DETAIL),
            related_movies: cell(COL_MOVIES),
        }
    }

    /// 行是否具备处理条件（id 和 title 均非空）
    pub fn has_key_fields(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }

    /// 是否还需要生成内容
    ///
    /// year / content_simple / content_detailed 只要有一列为空就需要生成
    pub fn is_content_needed(&self) -> bool {
        self.year.trim().is_empty()
            || self.content_simple.trim().is_empty()
            || self.content_detailed.trim().is_empty()
    }
}

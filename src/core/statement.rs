// DDL文記述子
//
// 生成したDDL文と、その有効化状態・DROP分類を保持する出力単位。
// 空の文しか持たない記述子は作成時点で捨てられます。

use serde::Serialize;

/// スクリプト1行（1文）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptLine {
    pub script: String,
    /// 破壊的（DROP系）な文か
    pub is_drop_script: bool,
}

impl ScriptLine {
    /// 作成・変更系の文
    pub fn create(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            is_drop_script: false,
        }
    }

    /// DROP系の文
    pub fn drop(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            is_drop_script: true,
        }
    }

    fn is_blank(&self) -> bool {
        self.script.trim().is_empty()
    }
}

/// DDL文記述子
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DdlStatement {
    pub scripts: Vec<ScriptLine>,
    /// falseの場合はコメントアウトして出力する
    pub is_activated: bool,
}

impl DdlStatement {
    /// 複数行から記述子を作成
    ///
    /// 空行は除外し、1行も残らなければNoneを返します。
    pub fn from_lines(lines: Vec<ScriptLine>, is_activated: bool) -> Option<Self> {
        let scripts: Vec<ScriptLine> = lines.into_iter().filter(|l| !l.is_blank()).collect();
        if scripts.is_empty() {
            return None;
        }

        Some(Self {
            scripts,
            is_activated,
        })
    }

    /// 作成・変更系の1文から記述子を作成
    pub fn create(script: impl Into<String>, is_activated: bool) -> Option<Self> {
        Self::from_lines(vec![ScriptLine::create(script)], is_activated)
    }

    /// DROP系の1文から記述子を作成
    pub fn drop(script: impl Into<String>, is_activated: bool) -> Option<Self> {
        Self::from_lines(vec![ScriptLine::drop(script)], is_activated)
    }

    /// DROPしてから作り直す2文の記述子を作成
    pub fn drop_and_recreate(
        drop_script: impl Into<String>,
        create_script: impl Into<String>,
        is_activated: bool,
    ) -> Option<Self> {
        Self::from_lines(
            vec![ScriptLine::drop(drop_script), ScriptLine::create(create_script)],
            is_activated,
        )
    }

    /// DROP系の行を含むか
    pub fn contains_drop_script(&self) -> bool {
        self.scripts.iter().any(|line| line.is_drop_script)
    }

    /// 先頭行がDROP系か（並び替えのキー）
    pub fn is_drop(&self) -> bool {
        self.scripts
            .first()
            .map(|line| line.is_drop_script)
            .unwrap_or(false)
    }
}

//! チャット履歴

use std::collections::VecDeque;

use super::entity::ChatLine;

/// ブロードキャストされたチャット行の順序付きバッファ
///
/// 既定では上限なし。上限を指定した場合は古い行から破棄する。
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    lines: VecDeque<ChatLine>,
    limit: Option<usize>,
}

impl HistoryBuffer {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// 最大 `limit` 行を保持する履歴を作成（`limit` は 1 以上）
    ///
    /// 領域は行の追加に合わせて確保する。
    pub fn with_limit(limit: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            limit: Some(limit.max(1)),
        }
    }

    /// 行を末尾に追加し、上限を超えた場合は破棄した行を返す
    pub fn append(&mut self, line: ChatLine) -> Option<ChatLine> {
        self.lines.push_back(line);
        match self.limit {
            Some(limit) if self.lines.len() > limit => self.lines.pop_front(),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatLine> {
        self.lines.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatLine> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParticipantName;

    fn line(body: &str) -> ChatLine {
        ChatLine::compose(
            "2024-01-02 03:04:05",
            &ParticipantName::new("alice").unwrap(),
            body,
        )
    }

    #[test]
    fn test_unbounded_history_keeps_every_line_in_order() {
        // テスト項目: 上限なしの履歴は全ての行を追加順に保持する
        // given (前提条件):
        let mut history = HistoryBuffer::unbounded();

        // when (操作):
        for i in 0..100 {
            assert_eq!(history.append(line(&i.to_string())), None);
        }

        // then (期待する結果):
        assert_eq!(history.len(), 100);
        let bodies: Vec<String> = history.iter().map(|l| l.to_string()).collect();
        assert_eq!(bodies[0], line("0").to_string());
        assert_eq!(bodies[99], line("99").to_string());
    }

    #[test]
    fn test_limited_history_evicts_oldest_line() {
        // テスト項目: 上限付きの履歴は上限を超えると最も古い行を破棄する
        // given (前提条件):
        let mut history = HistoryBuffer::with_limit(2);
        history.append(line("first"));
        history.append(line("second"));

        // when (操作):
        let evicted = history.append(line("third"));

        // then (期待する結果):
        assert_eq!(evicted, Some(line("first")));
        assert_eq!(history.to_vec(), vec![line("second"), line("third")]);
    }

    #[test]
    fn test_huge_limit_does_not_reserve_up_front() {
        // テスト項目: 非常に大きな上限を指定しても作成時に領域を確保せず、通常どおり追加できる
        // given (前提条件):
        let mut history = HistoryBuffer::with_limit(usize::MAX);

        // when (操作):
        let evicted = history.append(line("only"));

        // then (期待する結果):
        assert_eq!(evicted, None);
        assert_eq!(history.limit(), Some(usize::MAX));
        assert_eq!(history.to_vec(), vec![line("only")]);
    }
}

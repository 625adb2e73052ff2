//! Room 集約
//!
//! 参加者の一覧と履歴をひとつの集約として扱う。名前の一意性と人数上限は
//! ここで保証し、並行アクセスからの保護は Repository 実装が担う。

use super::{
    entity::{
        ChatLine, DeliveryReport, JoinReceipt, Participant, ParticipantSummary, Renamed,
        RoomSnapshot,
    },
    error::RegistryError,
    history::HistoryBuffer,
    value_object::{ConnectionId, JoinOrder, ParticipantName},
};

/// 同時接続できる参加者数の既定値
pub const DEFAULT_PARTICIPANT_CAPACITY: usize = 10;

#[derive(Debug)]
pub struct Room {
    /// 参加順に並んだ参加者
    participants: Vec<Participant>,
    history: HistoryBuffer,
    capacity: usize,
    last_join_order: u64,
}

impl Room {
    /// 上限なしの履歴を持つ Room を作成
    pub fn new(capacity: usize) -> Self {
        Self::with_history(capacity, HistoryBuffer::unbounded())
    }

    pub fn with_history(capacity: usize, history: HistoryBuffer) -> Self {
        Self {
            participants: Vec::new(),
            history,
            capacity,
            last_join_order: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn participant(&self, id: &ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// `except` 以外の参加者が `name` を使っているか
    fn is_name_taken(&self, name: &ParticipantName, except: Option<&ConnectionId>) -> bool {
        self.participants
            .iter()
            .any(|p| &p.name == name && Some(&p.id) != except)
    }

    /// 参加者を追加し、参加順を採番する
    pub fn add_participant(
        &mut self,
        mut participant: Participant,
    ) -> Result<JoinOrder, RegistryError> {
        if self.is_name_taken(&participant.name, None) {
            return Err(RegistryError::NameTaken(participant.name.into_string()));
        }
        if self.is_full() {
            return Err(RegistryError::AtCapacity(self.capacity));
        }

        self.last_join_order += 1;
        participant.join_order = JoinOrder::new(self.last_join_order);
        let join_order = participant.join_order;
        self.participants.push(participant);
        Ok(join_order)
    }

    /// 参加者を追加し、現在の履歴を新しい参加者の送信キューへ再生する
    ///
    /// 追加と再生を同じ操作で行うため、以後のチャット行は
    /// 履歴の再生と通常の配信のどちらか一方でだけ届く。
    /// 履歴は連結して送信キューの 1 件として積むので、履歴の長さに関わらず
    /// 新しい参加者のキューを使い切らない。
    pub fn join(&mut self, participant: Participant) -> Result<JoinReceipt, RegistryError> {
        let id = participant.id;
        let join_order = self.add_participant(participant)?;

        let mut replayed = 0;
        if let Some(joined) = self.participant(&id) {
            if !self.history.is_empty() {
                let backlog: String = self.history.iter().map(ChatLine::as_str).collect();
                if joined.deliver(&backlog).is_ok() {
                    replayed = self.history.len();
                }
            }
        }

        Ok(JoinReceipt {
            join_order,
            replayed,
        })
    }

    /// 参加者を削除（存在しなければ何もしない）
    pub fn remove_participant(&mut self, id: &ConnectionId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| &p.id == id)?;
        Some(self.participants.remove(index))
    }

    /// 参加者の名前を変更
    ///
    /// 新しい名前は自分以外の参加者とだけ比較する。旧名はすぐに再利用できる。
    pub fn rename_participant(
        &mut self,
        id: &ConnectionId,
        new_name: &str,
    ) -> Result<Renamed, RegistryError> {
        let new_name = ParticipantName::new(new_name).map_err(|_| RegistryError::NameEmpty)?;
        if self.participant(id).is_none() {
            return Err(RegistryError::NotRegistered(*id));
        }
        if self.is_name_taken(&new_name, Some(id)) {
            return Err(RegistryError::NameTaken(new_name.into_string()));
        }

        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RegistryError::NotRegistered(*id))?;
        let previous = std::mem::replace(&mut participant.name, new_name.clone());

        Ok(Renamed {
            previous,
            current: new_name,
        })
    }

    /// 参加順に並んだ参加者のスナップショット
    pub fn snapshot(&self) -> Vec<ParticipantSummary> {
        self.participants.iter().map(Participant::summary).collect()
    }

    pub fn room_snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            capacity: self.capacity,
            participants: self.snapshot(),
            history_len: self.history.len(),
        }
    }

    /// `excluded` 以外の全参加者の送信キューに `line` を積む
    ///
    /// 一部の参加者への配信が失敗しても残りへの配信は続ける。
    pub fn broadcast_except(&self, line: &str, excluded: Option<&ConnectionId>) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for participant in self.participants.iter().filter(|p| Some(&p.id) != excluded) {
            match participant.deliver(line) {
                Ok(()) => report.delivered += 1,
                Err(e) => report.failed.push(e),
            }
        }
        report
    }

    /// 送信者の現在の名前でチャット行を作り、履歴に追加して送信者以外へ配信する
    pub fn publish_chat(
        &mut self,
        from: &ConnectionId,
        timestamp: &str,
        body: &str,
    ) -> Result<(ChatLine, DeliveryReport), RegistryError> {
        let sender = self
            .participant(from)
            .ok_or(RegistryError::NotRegistered(*from))?;
        let line = ChatLine::compose(timestamp, &sender.name, body);

        self.history.append(line.clone());
        let report = self.broadcast_except(line.as_str(), Some(from));

        Ok((line, report))
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICIPANT_CAPACITY)
    }
}

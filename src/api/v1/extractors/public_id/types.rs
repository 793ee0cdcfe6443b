/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - decode ロジックや AppState 参照はここに置かない
 */
use super::core::PublicId;

// lectures
pub enum LectureTag {}
pub type PublicLectureId = PublicId<LectureTag>;

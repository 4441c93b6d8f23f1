/// プロファイルコード同士の相性（0〜100）
///
/// 実装は外部から注入する。スコアリング側は呼び出すだけで、範囲外の値は 0〜100 にクランプする。
pub trait Compatibility: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, a: &str, b: &str) -> f64;
}

/// 位置ごとの文字一致率による簡易実装（CLI・テスト用）
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterOverlapCompatibility;

impl Compatibility for LetterOverlapCompatibility {
    fn name(&self) -> &'static str {
        "letter_overlap"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.trim().to_lowercase().chars().collect();
        let b: Vec<char> = b.trim().to_lowercase().chars().collect();
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 0.0;
        }

        let agreeing = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
        100.0 * agreeing as f64 / longest as f64
    }
}

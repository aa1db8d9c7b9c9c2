/// A canned answer and the lowercase keywords that select it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub topic: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered by precedence: the first entry with a matching keyword wins.
pub const FAQ_ENTRIES: &[FaqEntry] = &[
    FaqEntry {
        topic: "営業時間",
        question: "営業時間を教えてください",
        answer: "弊社の営業時間は平日9:00-18:00です。土日祝日は休業となっております。お問い合わせは24時間受け付けておりますが、回答は営業時間内となります。",
        keywords: &["営業時間", "何時", "hours", "what time"],
    },
    FaqEntry {
        topic: "返品",
        question: "返品はできますか？",
        answer: "ご購入後14日以内であれば返品可能です。商品が未開封・未使用の状態であることが条件となります。返品をご希望の場合は、まずカスタマーサポートまでご連絡ください。",
        keywords: &["返品", "キャンセル", "return", "cancel"],
    },
    FaqEntry {
        topic: "送料",
        question: "送料はいくらですか？",
        answer: "全国一律500円です。ただし、5,000円以上のご購入で送料無料となります。お急ぎの場合は速達便（+1,000円）もご利用いただけます。",
        keywords: &["送料", "配送", "shipping fee", "delivery"],
    },
    FaqEntry {
        topic: "支払い",
        question: "支払い方法は何がありますか？",
        answer: "クレジットカード（Visa、Mastercard、JCB、AmEx）、銀行振込、代金引換、コンビニ決済がご利用いただけます。クレジットカード決済が最も早く発送可能です。",
        keywords: &["支払", "決済", "カード", "payment", "card"],
    },
    FaqEntry {
        topic: "会員登録",
        question: "会員登録は必要ですか？",
        answer: "会員登録なしでもご購入いただけますが、会員登録をしていただくとポイントが貯まり、次回以降のお買い物でご利用いただけます。また、購入履歴の確認も簡単になります。",
        keywords: &["会員", "登録", "アカウント", "membership", "register", "account"],
    },
];

/// Returned when no keyword matches: topic menu plus a support contact.
pub const FALLBACK_REPLY: &str = "ご質問ありがとうございます。詳しくはカスタマーサポート（support@example.com）までお問い合わせください。よくある質問: 営業時間、返品、送料、支払い方法、会員登録";

/// First entry whose keyword occurs in `message`, ignoring case.
pub fn match_entry(message: &str) -> Option<&'static FaqEntry> {
    let normalized = message.to_lowercase();

    FAQ_ENTRIES.iter().find(|entry| {
        entry
            .keywords
            .iter()
            .any(|keyword| normalized.contains(keyword))
    })
}

/// Canned reply for `message`. Never empty.
pub fn respond(message: &str) -> &'static str {
    match_entry(message).map_or(FALLBACK_REPLY, |entry| entry.answer)
}

/// Fixed system-role instruction describing the output contract.
pub const SYSTEM_PROMPT: &str = "You are an expert short-form content writer.
You turn long YouTube scripts or transcripts into multiple short-form video scripts for platforms like YouTube Shorts, TikTok, and Instagram Reels.
You write viral hooks, concise bodies, and clear CTAs.
Always respond with ONLY valid JSON, no extra text.
The JSON must be an array of objects like:
[
  {
    \"hook\": \"string\",
    \"body\": [\"line 1\", \"line 2\"],
    \"cta\": \"string\"
  }
]
Each body line should be short and punchy (max ~15 words).";

/// Per-request user instruction. The script is embedded verbatim.
pub fn build_user_prompt(script: &str, platform: &str, tone: &str, count: u32) -> String {
    format!(
        "Here is a long-form script or transcript:
---
{script}
---
Platform: {platform}
Tone/style: {tone}

Generate {count} short-form video scripts.

For each one, create:
- \"hook\": a scroll-stopping hook, max 15 words.
- \"body\": an array of 3-6 short lines (each under 15 words).
- \"cta\": one clear call-to-action line.

Return ONLY a JSON array with objects of shape:
{{ \"hook\": string, \"body\": string[], \"cta\": string }}
No explanation, no markdown, just the JSON."
    )
}

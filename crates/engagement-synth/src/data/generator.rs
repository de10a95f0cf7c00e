use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::datasets::{ChannelRow, VideoRow};
use crate::error::{SynthError, SynthResult};
use crate::series::records::random_uuid;

pub const DEFAULT_CHANNEL_HANDLES: [&str; 5] = ["umer", "Danny", "Talal", "Nemo", "Lelouch"];
const MAX_TITLE_ATTEMPTS: usize = 1_000;

const TITLE_PREFIXES: [&str; 22] = [
    "Ultimate Guide to",
    "How I Mastered",
    "10 Ways to Improve Your",
    "The Secret of",
    "Why You Should Try",
    "Let's Explore",
    "Breaking Down",
    "My Journey with",
    "The Truth About",
    "What Nobody Tells You About",
    "Inside the World of",
    "Beginner's Guide to",
    "Advanced Techniques for",
    "I Spent a Week",
    "24 Hours of",
    "Behind the Scenes of",
    "Review of",
    "First Look at",
    "Honest Opinion on",
    "The Best and Worst of",
    "Black",
    "Yay",
];

const TITLE_TOPICS: [&str; 32] = [
    "Photography",
    "Gaming",
    "Cooking",
    "Programming",
    "Hiking",
    "Fitness",
    "Financial Freedom",
    "Meditation",
    "Art",
    "Music Production",
    "Chess",
    "Data Science",
    "Machine Learning",
    "Cryptocurrency",
    "Woodworking",
    "Gardening",
    "Interior Design",
    "Martial Arts",
    "Drawing",
    "Animation",
    "Writing",
    "Public Speaking",
    "Productivity",
    "AI Tools",
    "Mobile Apps",
    "Social Media",
    "Digital Marketing",
    "Web Development",
    "Graphic Design",
    "Video Editing",
    "Man",
    "Watan",
];

const TITLE_SUFFIXES: [&str; 22] = [
    "in 2025",
    "for Beginners",
    "That Changed My Life",
    "- Full Tutorial",
    "| Step by Step Guide",
    "- What I Learned",
    "and Why It Matters",
    "- The Complete Process",
    "(Warning: Mind-blowing Results)",
    "- You Won't Believe What Happened",
    "| My Honest Experience",
    "vs Traditional Methods",
    "Challenge Results",
    "Experiment",
    "on a Budget",
    "Like a Pro",
    "in Just One Week",
    "Secrets Revealed",
    "That Nobody Talks About",
    "- Is It Worth It?",
    "Steal",
    "Hamara",
];

pub fn generate_channels<R: Rng + ?Sized>(
    rng: &mut R,
    handles: &[String],
    today: NaiveDate,
) -> Vec<ChannelRow> {
    handles
        .iter()
        .map(|handle| ChannelRow {
            channel_id: random_uuid(rng),
            handle: handle.clone(),
            channel_name: format!("{handle}'s Channel"),
            created_on: today,
            total_views: 0,
            total_subs: rng.gen_range(1_000..=100_000),
            total_comments: 0,
            total_watchtime: 0,
            total_revenue: 0.0,
            image_link: format!("https://example.com/{handle}.jpg"),
            description: format!(
                "Welcome to {handle}'s YouTube channel! Here you'll find awesome content about gaming, tech, and lifestyle."
            ),
        })
        .collect()
}

pub fn generate_videos<R: Rng + ?Sized>(
    rng: &mut R,
    channel_id: Uuid,
    count: usize,
    today: NaiveDate,
) -> SynthResult<Vec<VideoRow>> {
    let mut used_titles = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        let title = unique_title(rng, &mut used_titles)?;
        let age_days = rng.gen_range(1..=365);
        let created_on = today.checked_sub_days(Days::new(age_days)).ok_or_else(|| {
            SynthError::InvalidArgument(format!(
                "cannot back-date a video {age_days} days before {today}"
            ))
        })?;

        let views: u64 = rng.gen_range(1_000..=2_000_000);
        let avg_watch_minutes: f64 = rng.gen_range(1.5..=8.0);
        let watchtime = (views as f64 * avg_watch_minutes * 60.0) as u64;
        let subs_rate: f64 = rng.gen_range(0.005..=0.05);
        let subs = (views as f64 * subs_rate) as u64;
        let comment_rate: f64 = rng.gen_range(0.005..=0.03);
        let comments = (views as f64 * comment_rate) as u64;
        let cpm: f64 = rng.gen_range(1.0..=8.0);
        let revenue = round_cents(views as f64 / 1_000.0 * cpm);

        out.push(VideoRow {
            video_id: random_uuid(rng),
            channel_id,
            title,
            views,
            subs,
            revenue,
            comments,
            watchtime,
            created_on,
        });
    }

    Ok(out)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn unique_title<R: Rng + ?Sized>(
    rng: &mut R,
    used_titles: &mut HashSet<String>,
) -> SynthResult<String> {
    for _ in 0..MAX_TITLE_ATTEMPTS {
        let title = random_title(rng);
        if used_titles.insert(title.clone()) {
            return Ok(title);
        }
    }
    Err(SynthError::InvalidArgument(format!(
        "no unused video title found after {MAX_TITLE_ATTEMPTS} attempts ({} titles already taken)",
        used_titles.len()
    )))
}

fn random_title<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = pick(&TITLE_PREFIXES, rng);
    let topic = pick(&TITLE_TOPICS, rng);
    let suffix = pick(&TITLE_SUFFIXES, rng);
    format!("{prefix} {topic} {suffix}")
}

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

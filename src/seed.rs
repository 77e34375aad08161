use color_eyre::Result;
use eyre::{eyre, WrapErr};
use log::info;
use crate::db::{self, Pool};
use crate::db::entities::*;
use crate::db::helpers::excerpt_from_content;
use crate::utils::text_utils::slugify;
use crate::utils::time_utils::SECONDS_PER_DAY;

// Demo data for a fresh portal. Everything is relative to
// "now" so the articles are published and the announcements
// still running when you open the site.

const EXCERPT_LENGTH: usize = 200;
const ANNOUNCEMENT_VALIDITY_DAYS: i64 = 30;

struct SeedCategory {
  name: &'static str,
  slug: &'static str,
  description: &'static str,
  color: &'static str
}

const CATEGORIES: [SeedCategory; 5] = [
  SeedCategory {
    name: "Keamanan Siber",
    slug: "keamanan-siber",
    description: "Berita dan informasi terkait keamanan siber dan ancaman digital",
    color: "#DC2626"
  },
  SeedCategory {
    name: "Berita Daerah",
    slug: "berita-daerah",
    description: "Berita terkini seputar pemerintahan daerah OKU Timur",
    color: "#2563EB"
  },
  SeedCategory {
    name: "Kebijakan IT",
    slug: "kebijakan-it",
    description: "Kebijakan dan regulasi teknologi informasi",
    color: "#059669"
  },
  SeedCategory {
    name: "Edukasi Digital",
    slug: "edukasi-digital",
    description: "Tips, panduan, dan edukasi literasi digital",
    color: "#7C2D12"
  },
  SeedCategory {
    name: "Pengumuman Resmi",
    slug: "pengumuman-resmi",
    description: "Pengumuman resmi dari OKUTIMURKAB-CSIRT",
    color: "#7C3AED"
  }
];

struct SeedArticle {
  title: &'static str,
  category_slug: &'static str,
  content: &'static str,
  days_ago: i64,
  views_count: i64
}

const ARTICLES: [SeedArticle; 3] = [
  SeedArticle {
    title: "Peningkatan Serangan Ransomware di Indonesia: Langkah Preventif untuk Pemerintah Daerah",
    category_slug: "keamanan-siber",
    content: "<p>Dalam beberapa bulan terakhir, Indonesia mengalami peningkatan signifikan \
dalam serangan ransomware yang menargetkan institusi pemerintahan dan swasta. Tim \
OKUTIMURKAB-CSIRT mengimbau seluruh instansi pemerintah daerah untuk meningkatkan \
kewaspadaan dan menerapkan langkah-langkah preventif.</p>\n\
<h3>Langkah Preventif yang Direkomendasikan:</h3>\n<ul>\n\
<li>Melakukan backup data secara rutin dan menyimpannya di lokasi terpisah</li>\n\
<li>Memperbarui sistem operasi dan software secara berkala</li>\n\
<li>Menggunakan antivirus dan firewall yang terpercaya</li>\n\
<li>Memberikan training awareness keamanan siber kepada pegawai</li>\n\
<li>Menerapkan segmentasi jaringan untuk membatasi penyebaran malware</li>\n</ul>\n\
<p>OKUTIMURKAB-CSIRT siap memberikan dukungan teknis dan konsultasi kepada instansi \
yang memerlukan bantuan dalam meningkatkan postur keamanan siber.</p>",
    days_ago: 3,
    views_count: 342
  },
  SeedArticle {
    title: "Implementasi Sistem Informasi Terintegrasi Pemerintah Daerah OKU Timur",
    category_slug: "berita-daerah",
    content: "<p>Pemerintah Kabupaten Ogan Komering Ulu Timur meluncurkan sistem informasi \
terintegrasi yang bertujuan meningkatkan efisiensi pelayanan publik dan tata kelola \
pemerintahan.</p>\n<p>Fitur-fitur utama sistem meliputi:</p>\n<ul>\n\
<li>Dashboard analitik untuk monitoring kinerja instansi</li>\n\
<li>Sistem workflow otomatis untuk proses persetujuan</li>\n\
<li>Integrasi dengan sistem pembayaran digital</li>\n\
<li>Keamanan berlapis dengan enkripsi end-to-end</li>\n\
<li>Audit trail untuk pelacakan aktivitas pengguna</li>\n</ul>",
    days_ago: 9,
    views_count: 127
  },
  SeedArticle {
    title: "Panduan Keamanan Work From Home untuk Pegawai Pemerintah",
    category_slug: "edukasi-digital",
    content: "<p>Work From Home (WFH) memiliki risiko keamanan yang berbeda dibandingkan \
bekerja di kantor. Jaringan rumah umumnya tidak memiliki perlindungan sekuat jaringan \
kantor, sehingga diperlukan langkah-langkah tambahan.</p>\n\
<h3>Checklist Keamanan WFH:</h3>\n<ul>\n\
<li>Gunakan VPN resmi instansi untuk mengakses sistem internal</li>\n\
<li>Pastikan WiFi rumah menggunakan enkripsi WPA3</li>\n\
<li>Jangan menggunakan komputer pribadi untuk data rahasia</li>\n\
<li>Aktifkan automatic lock screen dan two-factor authentication</li>\n\
<li>Laporkan segera jika terjadi insiden keamanan</li>\n</ul>",
    days_ago: 21,
    views_count: 58
  }
];

const ANNOUNCEMENTS: [(&'static str, &'static str, Priority); 3] = [
  (
    "Peringatan Keamanan: Aktivitas Phishing Meningkat",
    "Kami mendeteksi peningkatan aktivitas phishing yang menargetkan email pegawai \
pemerintah daerah. Harap berhati-hati dengan email yang meminta informasi login atau \
data pribadi. Jangan klik link mencurigakan dan laporkan email phishing ke tim IT.",
    Priority::Urgent
  ),
  (
    "Pemeliharaan Sistem Terjadwal",
    "Sistem informasi akan menjalani pemeliharaan rutin pada hari Minggu pukul \
02:00 - 06:00 WIB. Selama periode ini, akses ke beberapa layanan mungkin terbatas.",
    Priority::Medium
  ),
  (
    "Workshop Keamanan Siber untuk Pegawai",
    "Tim OKUTIMURKAB-CSIRT akan mengadakan workshop keamanan siber. Workshop ini wajib \
diikuti oleh seluruh pegawai yang menangani sistem informasi.",
    Priority::High
  )
];

// Approved comments added to every seeded article. The first
// one is posted by the admin, the other by a guest.
const COMMENTS: [&'static str; 2] = [
  "Terima kasih atas informasinya, sangat bermanfaat untuk instansi kami.",
  "Apakah ada pelatihan lanjutan untuk topik ini?"
];

#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
  pub users: usize,
  pub categories: usize,
  pub articles: usize,
  pub announcements: usize,
  pub comments: usize
}

// Refuses to run twice, the slugs would clash anyway. Either
// everything is inserted or nothing is, so a failed seed can
// simply be run again. The pool needs a single connection,
// see db::with_transaction.
pub fn seed(pool: &Pool, now: i64) -> Result<SeedReport> {
  if !db::categories::active_categories(pool)?.is_empty() {
    return Err(eyre!("The database already has categories, refusing to seed it"));
  }
  let report = db::with_transaction(pool, |pool| insert_demo_data(pool, now))?;
  info!("Seeded the database: {:?}", report);
  Ok(report)
}

fn insert_demo_data(pool: &Pool, now: i64) -> Result<SeedReport> {
  let mut report = SeedReport::default();

  let admin_id = db::users::insert_user(
    pool,
    &NewUser {
      name: "Admin CSIRT".to_string(),
      email: "admin@okutimurkab-csirt.go.id".to_string()
    },
    now
  ).context("Creating the admin user")?;
  report.users += 1;

  let mut category_ids: Vec<(&str, i64)> = Vec::new();
  for c in CATEGORIES.iter() {
    let id = db::categories::insert_category(
      pool,
      &NewCategory {
        name: c.name.to_string(),
        slug: c.slug.to_string(),
        description: Some(c.description.to_string()),
        color: c.color.to_string(),
        is_active: true
      },
      now
    ).with_context(|| format!("Creating category {}", c.name))?;
    category_ids.push((c.slug, id));
    report.categories += 1;
  }

  for a in ARTICLES.iter() {
    let category_id = category_ids.iter()
      .find(|(slug, _)| *slug == a.category_slug)
      .map(|(_, id)| *id)
      .ok_or_else(|| eyre!("Unknown seed category {}", a.category_slug))?;
    let article_id = db::articles::insert_article(
      pool,
      &NewArticle {
        title: a.title.to_string(),
        slug: slugify(a.title),
        excerpt: Some(excerpt_from_content(a.content, EXCERPT_LENGTH)),
        content: a.content.to_string(),
        featured_image: None,
        category_id,
        user_id: admin_id,
        is_featured: true,
        is_published: true,
        published_at: Some(now - a.days_ago * SECONDS_PER_DAY),
        views_count: a.views_count
      },
      now
    ).with_context(|| format!("Creating article {}", a.title))?;
    report.articles += 1;

    for (i, content) in COMMENTS.iter().enumerate() {
      let comment = if i == 0 {
        NewComment {
          article_id,
          user_id: Some(admin_id),
          author_name: None,
          author_email: None,
          content: content.to_string()
        }
      } else {
        NewComment {
          article_id,
          user_id: None,
          author_name: Some("Warga OKU Timur".to_string()),
          author_email: Some("warga@example.org".to_string()),
          content: content.to_string()
        }
      };
      let comment_id = db::comments::insert_comment(pool, &comment, now)?;
      db::comments::approve_comment(pool, comment_id, now)?;
      report.comments += 1;
    }
  }

  for (title, content, priority) in ANNOUNCEMENTS.iter() {
    db::announcements::insert_announcement(
      pool,
      &NewAnnouncement {
        title: title.to_string(),
        content: content.to_string(),
        priority: *priority,
        is_active: true,
        expires_at: Some(now + ANNOUNCEMENT_VALIDITY_DAYS * SECONDS_PER_DAY),
        user_id: admin_id
      },
      now
    ).with_context(|| format!("Creating announcement {}", title))?;
    report.announcements += 1;
  }

  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::memory_pool;

  const NOW: i64 = 1705305600;

  #[test]
  fn seeds_a_browsable_portal() {
    let pool = memory_pool();
    let report = seed(&pool, NOW).unwrap();
    assert_eq!(
      SeedReport {
        users: 1,
        categories: 5,
        articles: 3,
        announcements: 3,
        comments: 6
      },
      report
    );
    let featured = db::articles::featured_published_articles(&pool, NOW, 3).unwrap();
    assert_eq!(3, featured.len());
    let urgent = db::announcements::urgent_announcements(&pool, NOW, 3).unwrap();
    assert_eq!(1, urgent.len());
    let comments = db::comments::approved_comments_for_article(&pool, featured[0].id)
      .unwrap();
    assert_eq!(2, comments.len());
  }

  #[test]
  fn announcements_expire_after_a_month() {
    let pool = memory_pool();
    seed(&pool, NOW).unwrap();
    let later = NOW + ANNOUNCEMENT_VALIDITY_DAYS * SECONDS_PER_DAY;
    assert!(db::announcements::urgent_announcements(&pool, later, 3).unwrap().is_empty());
  }

  #[test]
  fn failed_seed_inserts_nothing_and_can_be_retried() {
    let pool = memory_pool();
    // An inactive category doesn't stop the seed but its slug
    // clashes with the third seeded category.
    let blocker = db::categories::insert_category(
      &pool,
      &NewCategory {
        name: "Old IT policies".to_string(),
        slug: "kebijakan-it".to_string(),
        description: None,
        color: "#000000".to_string(),
        is_active: false
      },
      NOW
    ).unwrap();
    assert!(seed(&pool, NOW).is_err());
    assert!(db::users::user_by_id(&pool, 1).unwrap().is_none());
    assert!(db::categories::active_categories(&pool).unwrap().is_empty());

    let conn = pool.get().unwrap();
    conn.execute("DELETE FROM categories WHERE id = ?", [blocker]).unwrap();
    drop(conn);
    assert_eq!(5, seed(&pool, NOW).unwrap().categories);
  }

  #[test]
  fn refuses_to_seed_twice() {
    let pool = memory_pool();
    seed(&pool, NOW).unwrap();
    assert!(seed(&pool, NOW).is_err());
  }
}

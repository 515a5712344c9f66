//! The school application's menu and the base permission of every resource.
//!
//! Maps are written as merges of preset assignments; within each merge later
//! entries win, so the broad grant comes first and the narrowing after it.

use std::sync::{Arc, LazyLock};

use sekolah_core::{
    FULL_PERMISSIONS, READ_ONLY_PERMISSIONS, Role, RolePermissionMap, VIEW_CREATE_PERMISSIONS,
    VIEW_EDIT_PERMISSIONS, create_permission_for_roles as grant, merge_permissions,
};

use super::model::{Menu, MenuResource};

const STAFF: [Role; 3] = [Role::Admin, Role::KepalaSekolah, Role::Guru];
const FAMILY: [Role; 2] = [Role::Siswa, Role::OrangTua];

fn admin_full() -> RolePermissionMap {
    grant(&[Role::Admin], FULL_PERMISSIONS)
}

/// Admin full, everyone in `readers` read-only.
fn admin_full_read_for(readers: &[Role]) -> RolePermissionMap {
    merge_permissions([&grant(readers, READ_ONLY_PERMISSIONS), &admin_full()])
}

static SCHOOL_MENU: LazyLock<Arc<Menu>> = LazyLock::new(|| Arc::new(build_school_menu()));

/// The shared static menu.
pub fn school_menu() -> Arc<Menu> {
    Arc::clone(&SCHOOL_MENU)
}

fn build_school_menu() -> Menu {
    Menu::new(vec![
        MenuResource::item("Dashboard", "dashboard", grant(&Role::ALL, READ_ONLY_PERMISSIONS))
            .with_path("/"),
        MenuResource::group(
            "Data Master",
            vec![
                MenuResource::item(
                    "Data Siswa",
                    "siswa",
                    admin_full_read_for(&[Role::KepalaSekolah, Role::Guru, Role::PetugasKeuangan]),
                ),
                MenuResource::item(
                    "Data Guru",
                    "guru",
                    admin_full_read_for(&[Role::KepalaSekolah]),
                ),
                MenuResource::item("Kelas", "kelas", admin_full_read_for(&STAFF)),
                MenuResource::item("Mata Pelajaran", "mapel", admin_full_read_for(&STAFF)),
                MenuResource::item(
                    "Tahun Ajaran",
                    "tahun_ajaran",
                    admin_full_read_for(&[Role::KepalaSekolah]),
                ),
            ],
        ),
        MenuResource::group(
            "Akademik",
            vec![
                MenuResource::item(
                    "Jadwal Pelajaran",
                    "jadwal",
                    admin_full_read_for(&[
                        Role::KepalaSekolah,
                        Role::Guru,
                        Role::Siswa,
                        Role::OrangTua,
                    ]),
                ),
                MenuResource::item(
                    "Nilai",
                    "nilai",
                    merge_permissions([
                        &admin_full_read_for(&[Role::KepalaSekolah, Role::Siswa, Role::OrangTua]),
                        &grant(&[Role::Guru], VIEW_EDIT_PERMISSIONS),
                    ]),
                ),
                MenuResource::item(
                    "Absensi",
                    "absensi",
                    merge_permissions([
                        &admin_full_read_for(&[Role::KepalaSekolah, Role::Siswa, Role::OrangTua]),
                        &grant(&[Role::Guru], VIEW_CREATE_PERMISSIONS),
                    ]),
                ),
                MenuResource::item(
                    "Rapor",
                    "rapor",
                    merge_permissions([
                        &admin_full_read_for(&FAMILY),
                        &grant(&[Role::KepalaSekolah, Role::Guru], VIEW_EDIT_PERMISSIONS),
                    ]),
                ),
            ],
        ),
        MenuResource::group(
            "Pendidikan Agama",
            vec![
                MenuResource::item(
                    "Hafalan Al-Qur'an",
                    "hafalan",
                    merge_permissions([
                        &admin_full_read_for(&[Role::KepalaSekolah, Role::Siswa, Role::OrangTua]),
                        &grant(&[Role::Guru], VIEW_CREATE_PERMISSIONS),
                    ]),
                ),
                MenuResource::item(
                    "Catatan Ibadah",
                    "ibadah",
                    merge_permissions([
                        &admin_full_read_for(&[Role::KepalaSekolah, Role::Siswa, Role::OrangTua]),
                        &grant(&[Role::Guru], VIEW_EDIT_PERMISSIONS),
                    ]),
                ),
            ],
        ),
        MenuResource::group(
            "Keuangan",
            vec![
                MenuResource::item(
                    "Tagihan",
                    "tagihan",
                    merge_permissions([
                        &admin_full_read_for(&[Role::KepalaSekolah, Role::Siswa, Role::OrangTua]),
                        &grant(&[Role::PetugasKeuangan], VIEW_EDIT_PERMISSIONS),
                    ]),
                ),
                MenuResource::item(
                    "Pembayaran",
                    "pembayaran",
                    merge_permissions([
                        &admin_full_read_for(&[Role::KepalaSekolah, Role::OrangTua]),
                        &grant(&[Role::PetugasKeuangan], VIEW_CREATE_PERMISSIONS),
                    ]),
                ),
                MenuResource::item(
                    "Laporan Keuangan",
                    "laporan_keuangan",
                    admin_full_read_for(&[Role::KepalaSekolah, Role::PetugasKeuangan]),
                ),
            ],
        ),
        MenuResource::group(
            "Komunikasi",
            vec![MenuResource::item(
                "Pengumuman",
                "pengumuman",
                merge_permissions([
                    &grant(&Role::ALL, READ_ONLY_PERMISSIONS),
                    &grant(&[Role::KepalaSekolah, Role::Guru], VIEW_CREATE_PERMISSIONS),
                    &admin_full(),
                ]),
            )],
        ),
        MenuResource::group(
            "Pengaturan",
            vec![
                MenuResource::item("Pengguna", "pengguna", admin_full()),
                MenuResource::item("Hak Akses", "hak_akses", admin_full()),
                MenuResource::item(
                    "Profil Sekolah",
                    "profil_sekolah",
                    merge_permissions([
                        &admin_full(),
                        &grant(&[Role::KepalaSekolah], VIEW_EDIT_PERMISSIONS),
                    ]),
                ),
            ],
        ),
    ])
}

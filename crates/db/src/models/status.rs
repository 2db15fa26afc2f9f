//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        EnRevision = 1,
        Aprobado = 2,
        NoAprobado = 3,
        Finalizado = 4,
    }
}

define_status_enum! {
    /// Participation lifecycle status.
    ParticipationStatus {
        Activo = 1,
        Retirado = 2,
        Finalizado = 3,
    }
}

define_status_enum! {
    /// Weekly activity report workflow status.
    ActivityReportStatus {
        EnEdicion = 1,
        Enviado = 2,
        Aprobado = 3,
        Rechazado = 4,
    }
}

define_status_enum! {
    /// Semester report workflow status.
    SemesterReportStatus {
        EnEdicion = 1,
        Cerrado = 2,
        Aprobado = 3,
        /// Present in the lookup table but unreachable: no transition
        /// path leads here.
        Rechazado = 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_status_ids_match_seed_data() {
        assert_eq!(ProjectStatus::EnRevision.id(), 1);
        assert_eq!(ProjectStatus::Aprobado.id(), 2);
        assert_eq!(ProjectStatus::NoAprobado.id(), 3);
        assert_eq!(ProjectStatus::Finalizado.id(), 4);
    }

    #[test]
    fn participation_status_ids_match_seed_data() {
        assert_eq!(ParticipationStatus::Activo.id(), 1);
        assert_eq!(ParticipationStatus::Retirado.id(), 2);
        assert_eq!(ParticipationStatus::Finalizado.id(), 3);
    }

    #[test]
    fn activity_report_status_ids_match_seed_data() {
        assert_eq!(ActivityReportStatus::EnEdicion.id(), 1);
        assert_eq!(ActivityReportStatus::Enviado.id(), 2);
        assert_eq!(ActivityReportStatus::Aprobado.id(), 3);
        assert_eq!(ActivityReportStatus::Rechazado.id(), 4);
    }

    #[test]
    fn semester_report_status_ids_match_seed_data() {
        assert_eq!(SemesterReportStatus::EnEdicion.id(), 1);
        assert_eq!(SemesterReportStatus::Cerrado.id(), 2);
        assert_eq!(SemesterReportStatus::Aprobado.id(), 3);
        assert_eq!(SemesterReportStatus::Rechazado.id(), 4);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = ParticipationStatus::Activo.into();
        assert_eq!(id, 1);
    }
}

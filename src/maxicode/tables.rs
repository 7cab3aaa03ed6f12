//! Fixed MaxiCode tables: the module sequence of the 33 row grid and the
//! code set of every byte.

use super::codewords::CodeSet::{self, A, B, C, D, E};

/// Rows x columns of the module grid, odd rows offset by half a module.
pub const ROWS: usize = 33;
pub const COLUMNS: usize = 30;

/// Module `n` (1-based) of the grid carries bit `(n - 1) % 6` (most
/// significant first) of codeword `(n - 1) / 6`. Zero marks the bullseye
/// area, orientation and unused modules.
#[rustfmt::skip]
pub const GRID: [[u16; COLUMNS]; ROWS] = [
    [122, 121, 128, 127, 134, 133, 140, 139, 146, 145, 152, 151, 158, 157, 164, 163, 170, 169, 176, 175, 182, 181, 188, 187, 194, 193, 200, 199, 0, 0],
    [124, 123, 130, 129, 136, 135, 142, 141, 148, 147, 154, 153, 160, 159, 166, 165, 172, 171, 178, 177, 184, 183, 190, 189, 196, 195, 202, 201, 817, 0],
    [126, 125, 132, 131, 138, 137, 144, 143, 150, 149, 156, 155, 162, 161, 168, 167, 174, 173, 180, 179, 186, 185, 192, 191, 198, 197, 204, 203, 819, 818],
    [284, 283, 278, 277, 272, 271, 266, 265, 260, 259, 254, 253, 248, 247, 242, 241, 236, 235, 230, 229, 224, 223, 218, 217, 212, 211, 206, 205, 820, 0],
    [286, 285, 280, 279, 274, 273, 268, 267, 262, 261, 256, 255, 250, 249, 244, 243, 238, 237, 232, 231, 226, 225, 220, 219, 214, 213, 208, 207, 822, 821],
    [288, 287, 282, 281, 276, 275, 270, 269, 264, 263, 258, 257, 252, 251, 246, 245, 240, 239, 234, 233, 228, 227, 222, 221, 216, 215, 210, 209, 823, 0],
    [290, 289, 296, 295, 302, 301, 308, 307, 314, 313, 320, 319, 326, 325, 332, 331, 338, 337, 344, 343, 350, 349, 356, 355, 362, 361, 368, 367, 825, 824],
    [292, 291, 298, 297, 304, 303, 310, 309, 316, 315, 322, 321, 328, 327, 334, 333, 340, 339, 346, 345, 352, 351, 358, 357, 364, 363, 370, 369, 826, 0],
    [294, 293, 300, 299, 306, 305, 312, 311, 318, 317, 324, 323, 330, 329, 336, 335, 342, 341, 348, 347, 354, 353, 360, 359, 366, 365, 372, 371, 828, 827],
    [410, 409, 404, 403, 398, 397, 392, 391, 80, 79, 0, 0, 14, 13, 38, 37, 3, 0, 45, 44, 110, 109, 386, 385, 380, 379, 374, 373, 829, 0],
    [412, 411, 406, 405, 400, 399, 394, 393, 82, 81, 41, 0, 16, 15, 40, 39, 4, 0, 0, 46, 112, 111, 388, 387, 382, 381, 376, 375, 831, 830],
    [414, 413, 408, 407, 402, 401, 396, 395, 84, 83, 42, 0, 0, 0, 0, 0, 6, 5, 48, 47, 114, 113, 390, 389, 384, 383, 378, 377, 832, 0],
    [416, 415, 422, 421, 428, 427, 104, 103, 56, 55, 17, 0, 0, 0, 0, 0, 0, 0, 21, 20, 86, 85, 434, 433, 440, 439, 446, 445, 834, 833],
    [418, 417, 424, 423, 430, 429, 106, 105, 58, 57, 0, 0, 0, 0, 0, 0, 0, 0, 23, 22, 88, 87, 436, 435, 442, 441, 448, 447, 835, 0],
    [420, 419, 426, 425, 432, 431, 108, 107, 60, 59, 0, 0, 0, 0, 0, 0, 0, 0, 0, 24, 90, 89, 438, 437, 444, 443, 450, 449, 837, 836],
    [482, 481, 476, 475, 470, 469, 49, 0, 31, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 54, 53, 464, 463, 458, 457, 452, 451, 838, 0],
    [484, 483, 478, 477, 472, 471, 50, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 466, 465, 460, 459, 454, 453, 840, 839],
    [486, 485, 480, 479, 474, 473, 52, 51, 32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 43, 468, 467, 462, 461, 456, 455, 841, 0],
    [488, 487, 494, 493, 500, 499, 98, 97, 62, 61, 0, 0, 0, 0, 0, 0, 0, 0, 0, 27, 92, 91, 506, 505, 512, 511, 518, 517, 843, 842],
    [490, 489, 496, 495, 502, 501, 100, 99, 64, 63, 0, 0, 0, 0, 0, 0, 0, 0, 29, 28, 94, 93, 508, 507, 514, 513, 520, 519, 844, 0],
    [492, 491, 498, 497, 504, 503, 102, 101, 66, 65, 18, 0, 0, 0, 0, 0, 0, 0, 19, 30, 96, 95, 510, 509, 516, 515, 522, 521, 846, 845],
    [560, 559, 554, 553, 548, 547, 542, 541, 74, 73, 33, 0, 0, 0, 0, 0, 0, 11, 68, 67, 116, 115, 536, 535, 530, 529, 524, 523, 847, 0],
    [562, 561, 556, 555, 550, 549, 544, 543, 76, 75, 0, 0, 8, 7, 36, 35, 12, 0, 70, 69, 118, 117, 538, 537, 532, 531, 526, 525, 849, 848],
    [564, 563, 558, 557, 552, 551, 546, 545, 78, 77, 0, 34, 10, 9, 26, 25, 0, 0, 72, 71, 120, 119, 540, 539, 534, 533, 528, 527, 850, 0],
    [566, 565, 572, 571, 578, 577, 584, 583, 590, 589, 596, 595, 602, 601, 608, 607, 614, 613, 620, 619, 626, 625, 632, 631, 638, 637, 644, 643, 852, 851],
    [568, 567, 574, 573, 580, 579, 586, 585, 592, 591, 598, 597, 604, 603, 610, 609, 616, 615, 622, 621, 628, 627, 634, 633, 640, 639, 646, 645, 853, 0],
    [570, 569, 576, 575, 582, 581, 588, 587, 594, 593, 600, 599, 606, 605, 612, 611, 618, 617, 624, 623, 630, 629, 636, 635, 642, 641, 648, 647, 855, 854],
    [728, 727, 722, 721, 716, 715, 710, 709, 704, 703, 698, 697, 692, 691, 686, 685, 680, 679, 674, 673, 668, 667, 662, 661, 656, 655, 650, 649, 856, 0],
    [730, 729, 724, 723, 718, 717, 712, 711, 706, 705, 700, 699, 694, 693, 688, 687, 682, 681, 676, 675, 670, 669, 664, 663, 658, 657, 652, 651, 858, 857],
    [732, 731, 726, 725, 720, 719, 714, 713, 708, 707, 702, 701, 696, 695, 690, 689, 684, 683, 678, 677, 672, 671, 666, 665, 660, 659, 654, 653, 859, 0],
    [734, 733, 740, 739, 746, 745, 752, 751, 758, 757, 764, 763, 770, 769, 776, 775, 782, 781, 788, 787, 794, 793, 800, 799, 806, 805, 812, 811, 861, 860],
    [736, 735, 742, 741, 748, 747, 754, 753, 760, 759, 766, 765, 772, 771, 778, 777, 784, 783, 790, 789, 796, 795, 802, 801, 808, 807, 814, 813, 862, 0],
    [738, 737, 744, 743, 750, 749, 756, 755, 762, 761, 768, 767, 774, 773, 780, 779, 786, 785, 792, 791, 798, 797, 804, 803, 810, 809, 816, 815, 864, 863],
];

/// Always dark (row, column) modules around the bullseye and in the top
/// right corner, telling the reader the symbol orientation.
pub const ORIENTATION: [(usize, usize); 13] = [
    (0, 28), (0, 29), (9, 10), (9, 11), (10, 11), (15, 7), (16, 8),
    (16, 20), (17, 20), (22, 10), (23, 10), (22, 17), (23, 17),
];

/// Code set and value of every byte. Characters present in several sets
/// (CR, FS, GS, RS, space, comma, full stop, slash and colon) list their
/// set A value, the alternatives are resolved while encoding.
#[rustfmt::skip]
pub const CHARACTERS: [(CodeSet, u8); 256] = [
    (E, 0), (E, 1), (E, 2), (E, 3), (E, 4), (E, 5), (E, 6), (E, 7),
    (E, 8), (E, 9), (E, 10), (E, 11), (E, 12), (A, 0), (E, 14), (E, 15),
    (E, 16), (E, 17), (E, 18), (E, 19), (E, 20), (E, 21), (E, 22), (E, 23),
    (E, 24), (E, 25), (E, 26), (E, 30), (A, 28), (A, 29), (A, 30), (E, 35),
    (A, 32), (B, 53), (A, 34), (A, 35), (A, 36), (A, 37), (A, 38), (A, 39),
    (A, 40), (A, 41), (A, 42), (A, 43), (A, 44), (A, 45), (A, 46), (A, 47),
    (A, 48), (A, 49), (A, 50), (A, 51), (A, 52), (A, 53), (A, 54), (A, 55),
    (A, 56), (A, 57), (A, 58), (B, 37), (B, 38), (B, 39), (B, 40), (B, 41),
    (B, 52), (A, 1), (A, 2), (A, 3), (A, 4), (A, 5), (A, 6), (A, 7),
    (A, 8), (A, 9), (A, 10), (A, 11), (A, 12), (A, 13), (A, 14), (A, 15),
    (A, 16), (A, 17), (A, 18), (A, 19), (A, 20), (A, 21), (A, 22), (A, 23),
    (A, 24), (A, 25), (A, 26), (B, 42), (B, 43), (B, 44), (B, 45), (B, 46),
    (B, 0), (B, 1), (B, 2), (B, 3), (B, 4), (B, 5), (B, 6), (B, 7),
    (B, 8), (B, 9), (B, 10), (B, 11), (B, 12), (B, 13), (B, 14), (B, 15),
    (B, 16), (B, 17), (B, 18), (B, 19), (B, 20), (B, 21), (B, 22), (B, 23),
    (B, 24), (B, 25), (B, 26), (B, 32), (B, 54), (B, 34), (B, 35), (B, 36),
    (C, 48), (C, 49), (C, 50), (C, 51), (C, 52), (C, 53), (C, 54), (C, 55),
    (C, 56), (C, 57), (D, 47), (D, 48), (D, 49), (D, 50), (D, 51), (D, 52),
    (D, 53), (D, 54), (D, 55), (D, 56), (D, 57), (E, 47), (E, 48), (E, 49),
    (E, 50), (E, 51), (E, 52), (E, 53), (E, 54), (E, 55), (E, 56), (E, 57),
    (E, 36), (D, 37), (E, 37), (E, 38), (E, 39), (E, 40), (E, 41), (E, 42),
    (D, 38), (E, 43), (C, 37), (D, 39), (C, 38), (E, 44), (E, 45), (D, 40),
    (D, 41), (C, 39), (C, 40), (C, 41), (D, 42), (C, 42), (E, 46), (D, 43),
    (D, 44), (C, 43), (C, 44), (D, 45), (C, 45), (C, 46), (C, 47), (D, 46),
    (C, 0), (C, 1), (C, 2), (C, 3), (C, 4), (C, 5), (C, 6), (C, 7),
    (C, 8), (C, 9), (C, 10), (C, 11), (C, 12), (C, 13), (C, 14), (C, 15),
    (C, 16), (C, 17), (C, 18), (C, 19), (C, 20), (C, 21), (C, 22), (C, 23),
    (C, 24), (C, 25), (C, 26), (C, 32), (C, 33), (C, 34), (C, 35), (C, 36),
    (D, 0), (D, 1), (D, 2), (D, 3), (D, 4), (D, 5), (D, 6), (D, 7),
    (D, 8), (D, 9), (D, 10), (D, 11), (D, 12), (D, 13), (D, 14), (D, 15),
    (D, 16), (D, 17), (D, 18), (D, 19), (D, 20), (D, 21), (D, 22), (D, 23),
    (D, 24), (D, 25), (D, 26), (D, 32), (D, 33), (D, 34), (D, 35), (D, 36),
];
